// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The session talks to a `ProcessBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests (or the
//! dry-run backend on the CLI) while keeping the real orchestration in
//! [`super::orchestrator`].

use std::future::Future;
use std::pin::Pin;

use crate::engine::Invocation;
use crate::errors::Result;

pub type BackendFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Trait abstracting how invocations become processes.
///
/// Production code uses [`super::ProcessOrchestrator`]; tests can provide
/// their own implementation that records invocations instead.
///
/// Returned errors are session-ending. A command that cannot be found or
/// executed is not an error at this level.
pub trait ProcessBackend: Send {
    /// Run one command and wait for it to exit.
    fn run_single<'a>(&'a mut self, command: &'a str) -> BackendFuture<'a>;

    /// Start one command and return without waiting.
    fn run_background<'a>(&'a mut self, command: &'a str) -> BackendFuture<'a>;

    /// Run `producer | consumer` over one pipe and wait for both.
    fn run_piped<'a>(&'a mut self, producer: &'a str, consumer: &'a str) -> BackendFuture<'a>;

    /// Collect already-finished background children without blocking.
    /// Returns how many were collected.
    fn reap_background(&mut self) -> usize;

    /// Route an invocation to the matching `run_*` method.
    fn execute<'a>(&'a mut self, invocation: &'a Invocation) -> BackendFuture<'a> {
        match invocation {
            Invocation::Single(cmd) => self.run_single(cmd),
            Invocation::Background(cmd) => self.run_background(cmd),
            Invocation::Piped { producer, consumer } => self.run_piped(producer, consumer),
        }
    }
}
