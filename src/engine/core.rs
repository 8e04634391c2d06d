// src/engine/core.rs

//! Pure dispatcher state machine.
//!
//! The core consumes [`LineEvent`]s and produces a [`DispatchStep`]: at most
//! one [`Invocation`] to execute plus whether to keep reading. It has no
//! tokio types, no readers and no processes, so every transition can be unit
//! tested directly.
//!
//! The async shell (`engine::runtime::Session`) is responsible for:
//! - pulling lines from the element reader
//! - handing invocations to the process backend
//! - reaping background children between lines

use tracing::warn;

use crate::config::DEFAULT_TERMINATION_TOKEN;
use crate::engine::event_handlers::{
    DispatchStep, handle_control_line, handle_end_of_stream, handle_first_command,
    handle_second_command,
};
use crate::engine::{LineEvent, SessionEnd, SessionState};

#[derive(Debug)]
pub struct Dispatcher {
    state: SessionState,
    termination_token: String,
}

impl Dispatcher {
    pub fn new(termination_token: impl Into<String>) -> Self {
        Self {
            state: SessionState::Reading,
            termination_token: termination_token.into(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    /// Handle a single line event, updating state and returning what the IO
    /// shell should do next.
    pub fn step(&mut self, event: LineEvent) -> DispatchStep {
        let line = match event {
            LineEvent::EndOfStream => return handle_end_of_stream(&mut self.state),
            LineEvent::Line(line) => line,
        };

        // Every arm below writes the next state back.
        match std::mem::replace(&mut self.state, SessionState::Reading) {
            SessionState::Reading => {
                handle_control_line(&mut self.state, &line, &self.termination_token)
            }
            SessionState::AwaitingCommand1(mode) => {
                handle_first_command(&mut self.state, mode, line)
            }
            SessionState::AwaitingCommand2 { first } => {
                handle_second_command(&mut self.state, first, line)
            }
            SessionState::Executing => {
                warn!("line received while an invocation is still executing; treating as control line");
                handle_control_line(&mut self.state, &line, &self.termination_token)
            }
            SessionState::Terminated => {
                self.state = SessionState::Terminated;
                DispatchStep::stop(SessionEnd::TerminationToken)
            }
        }
    }

    /// Called by the IO shell once the invocation from the last step has
    /// been handed off (and awaited, for synchronous and piped modes).
    pub fn execution_finished(&mut self) {
        if self.state == SessionState::Executing {
            self.state = SessionState::Reading;
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATION_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Invocation;
    use crate::types::ExecMode;

    fn line(s: &str) -> LineEvent {
        LineEvent::Line(s.to_string())
    }

    /// Feed lines, completing every invocation immediately.
    fn run_lines(core: &mut Dispatcher, lines: &[&str]) -> Vec<Invocation> {
        let mut out = Vec::new();
        for l in lines {
            let step = core.step(line(l));
            if let Some(inv) = step.invocation {
                out.push(inv);
                core.execution_finished();
            }
            if !step.keep_running {
                break;
            }
        }
        out
    }

    #[test]
    fn single_sequence() {
        let mut core = Dispatcher::default();
        let step = core.step(line("SINGLE"));
        assert_eq!(step, DispatchStep::idle());
        assert_eq!(core.state(), &SessionState::AwaitingCommand1(ExecMode::Single));

        let step = core.step(line("echo hi"));
        assert_eq!(step.invocation, Some(Invocation::Single("echo hi".into())));
        assert!(step.keep_running);
        assert_eq!(core.state(), &SessionState::Executing);

        core.execution_finished();
        assert_eq!(core.state(), &SessionState::Reading);
    }

    #[test]
    fn concurrent_then_exit() {
        let mut core = Dispatcher::default();
        let invs = run_lines(&mut core, &["CONCURRENT", "sleep 5", "EXIT", "SINGLE", "ls"]);
        assert_eq!(invs, vec![Invocation::Background("sleep 5".into())]);
        assert!(core.is_terminated());
    }

    #[test]
    fn piped_and_alias() {
        let mut core = Dispatcher::default();
        let invs = run_lines(
            &mut core,
            &["PIPED", "printer", "counter", "PIPE", "ls -l", "wc -l"],
        );
        assert_eq!(
            invs,
            vec![
                Invocation::Piped {
                    producer: "printer".into(),
                    consumer: "counter".into()
                },
                Invocation::Piped {
                    producer: "ls -l".into(),
                    consumer: "wc -l".into()
                },
            ]
        );
    }

    #[test]
    fn unrecognized_lines_are_ignored() {
        let mut core = Dispatcher::default();
        let invs = run_lines(&mut core, &["hello", "", "single", "SINGLE", "true"]);
        assert_eq!(invs, vec![Invocation::Single("true".into())]);
        assert_eq!(core.state(), &SessionState::Reading);
    }

    #[test]
    fn exit_inside_sequence_is_a_command() {
        let mut core = Dispatcher::default();
        let invs = run_lines(&mut core, &["SINGLE", "EXIT"]);
        assert_eq!(invs, vec![Invocation::Single("EXIT".into())]);
        assert!(!core.is_terminated());
    }

    #[test]
    fn end_of_stream_abandons_partial_sequence() {
        let mut core = Dispatcher::default();
        run_lines(&mut core, &["PIPED", "printer"]);
        let step = core.step(LineEvent::EndOfStream);
        assert_eq!(step.invocation, None);
        assert!(!step.keep_running);
        assert_eq!(step.end, Some(SessionEnd::EndOfStream));
        assert!(core.is_terminated());
    }

    #[test]
    fn custom_termination_token() {
        let mut core = Dispatcher::new("QUIT");
        let step = core.step(line("EXIT"));
        assert!(step.keep_running);
        let step = core.step(line("QUIT"));
        assert_eq!(step.end, Some(SessionEnd::TerminationToken));
    }
}
