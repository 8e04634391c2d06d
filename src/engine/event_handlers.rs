// src/engine/event_handlers.rs

//! Transition functions for the dispatcher state machine.

use tracing::{debug, info};

use crate::engine::{Invocation, SessionEnd, SessionState};
use crate::types::{ControlLine, ExecMode};

/// Decision returned by the core after handling a single `LineEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchStep {
    /// Invocation the IO shell should execute before reading more input.
    pub invocation: Option<Invocation>,
    /// Whether the outer loop should keep reading lines.
    pub keep_running: bool,
    /// Set when `keep_running` is false.
    pub end: Option<SessionEnd>,
}

impl DispatchStep {
    pub(crate) fn idle() -> Self {
        Self {
            invocation: None,
            keep_running: true,
            end: None,
        }
    }

    pub(crate) fn dispatch(invocation: Invocation) -> Self {
        Self {
            invocation: Some(invocation),
            keep_running: true,
            end: None,
        }
    }

    pub(crate) fn stop(end: SessionEnd) -> Self {
        Self {
            invocation: None,
            keep_running: false,
            end: Some(end),
        }
    }
}

/// Handle a line read while expecting a control line.
///
/// - The termination token ends the session, even with input remaining.
/// - A mode line moves to `AwaitingCommand1`.
/// - Anything else is ignored.
pub fn handle_control_line(
    state: &mut SessionState,
    line: &str,
    termination_token: &str,
) -> DispatchStep {
    match ControlLine::classify(line, termination_token) {
        ControlLine::Terminate => {
            info!("termination token read; ending session");
            *state = SessionState::Terminated;
            DispatchStep::stop(SessionEnd::TerminationToken)
        }
        ControlLine::Mode(mode) => {
            debug!(%mode, "mode line");
            *state = SessionState::AwaitingCommand1(mode);
            DispatchStep::idle()
        }
        ControlLine::Unrecognized => {
            debug!(line, "ignoring unrecognized control line");
            DispatchStep::idle()
        }
    }
}

/// Handle the first command line following a mode line.
///
/// Command lines are taken verbatim; the termination token is not
/// recognised here.
pub fn handle_first_command(
    state: &mut SessionState,
    mode: ExecMode,
    line: String,
) -> DispatchStep {
    match mode {
        ExecMode::Single => {
            *state = SessionState::Executing;
            DispatchStep::dispatch(Invocation::Single(line))
        }
        ExecMode::Concurrent => {
            *state = SessionState::Executing;
            DispatchStep::dispatch(Invocation::Background(line))
        }
        ExecMode::Piped => {
            *state = SessionState::AwaitingCommand2 { first: line };
            DispatchStep::idle()
        }
    }
}

/// Handle the second command line of a piped sequence.
pub fn handle_second_command(
    state: &mut SessionState,
    first: String,
    line: String,
) -> DispatchStep {
    *state = SessionState::Executing;
    DispatchStep::dispatch(Invocation::Piped {
        producer: first,
        consumer: line,
    })
}

/// Handle end-of-stream in any state.
///
/// A partially assembled control sequence is abandoned; nothing runs.
pub fn handle_end_of_stream(state: &mut SessionState) -> DispatchStep {
    match state {
        SessionState::AwaitingCommand1(mode) => {
            info!(mode = %mode, "end of input while awaiting a command; abandoning sequence");
        }
        SessionState::AwaitingCommand2 { first } => {
            info!(first = %first, "end of input while awaiting second piped command; abandoning sequence");
        }
        _ => debug!("end of input"),
    }
    *state = SessionState::Terminated;
    DispatchStep::stop(SessionEnd::EndOfStream)
}
