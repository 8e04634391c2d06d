// src/engine/mod.rs

//! Command dispatch engine.
//!
//! This module ties together:
//! - the line reader (bytes -> lines)
//! - the control-line state machine (lines -> invocations)
//! - the process backend (invocations -> child processes)
//!
//! The pure state machine lives in [`core`] with its transitions in
//! [`event_handlers`]; the async/IO shell is implemented in [`runtime`].

use crate::types::ExecMode;

/// Input to the core state machine: one extracted line, or the end of the
/// byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Line(String),
    EndOfStream,
}

/// A fully assembled control sequence, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Run one command and wait for it.
    Single(String),
    /// Run one command without waiting.
    Background(String),
    /// Run `producer | consumer` and wait for both.
    Piped { producer: String, consumer: String },
}

impl Invocation {
    pub fn mode(&self) -> ExecMode {
        match self {
            Invocation::Single(_) => ExecMode::Single,
            Invocation::Background(_) => ExecMode::Concurrent,
            Invocation::Piped { .. } => ExecMode::Piped,
        }
    }
}

/// Where the session is in assembling a control sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Expecting a control line.
    Reading,
    /// Mode line seen; expecting the (first) command line.
    AwaitingCommand1(ExecMode),
    /// Piped mode; first command collected, expecting the second.
    AwaitingCommand2 { first: String },
    /// An invocation was handed to the IO shell and has not completed yet.
    Executing,
    /// No further lines will be processed.
    Terminated,
}

/// Why a session stopped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The termination token was read.
    TerminationToken,
    /// The byte stream ended (possibly in the middle of a control sequence).
    EndOfStream,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use self::core::Dispatcher;
pub use event_handlers::DispatchStep;
pub use runtime::Session;
