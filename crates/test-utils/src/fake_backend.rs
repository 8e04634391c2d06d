use std::sync::{Arc, Mutex};

use ringsh::engine::Invocation;
use ringsh::errors::{Result, ShellError};
use ringsh::exec::{BackendFuture, ProcessBackend};

/// Everything a `RecordingBackend` observed, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub invocations: Vec<Invocation>,
    /// Number of reap sweeps performed.
    pub reap_calls: usize,
    /// `reap_calls` at the time each invocation arrived.
    pub reaps_before: Vec<usize>,
}

/// A fake backend that:
/// - records which invocations were executed
/// - counts reap sweeps
/// - optionally fails the n-th invocation with a spawn error.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    recorded: Arc<Mutex<Recorded>>,
    fail_at: Option<usize>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the invocation with this zero-based index fail as if the OS
    /// refused to create a process.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    /// Shared handle to the recorded state; stays valid after the backend
    /// has been moved into a session.
    pub fn recorded(&self) -> Arc<Mutex<Recorded>> {
        Arc::clone(&self.recorded)
    }

    fn record(&mut self, invocation: Invocation) -> Result<()> {
        let mut guard = self.recorded.lock().unwrap();
        let index = guard.invocations.len();
        let reaps = guard.reap_calls;
        guard.invocations.push(invocation);
        guard.reaps_before.push(reaps);

        if self.fail_at == Some(index) {
            return Err(ShellError::Spawn {
                program: "fake".to_string(),
                source: std::io::Error::other("simulated spawn failure"),
            });
        }
        Ok(())
    }
}

impl ProcessBackend for RecordingBackend {
    fn run_single<'a>(&'a mut self, command: &'a str) -> BackendFuture<'a> {
        let res = self.record(Invocation::Single(command.to_string()));
        Box::pin(async move { res })
    }

    fn run_background<'a>(&'a mut self, command: &'a str) -> BackendFuture<'a> {
        let res = self.record(Invocation::Background(command.to_string()));
        Box::pin(async move { res })
    }

    fn run_piped<'a>(&'a mut self, producer: &'a str, consumer: &'a str) -> BackendFuture<'a> {
        let res = self.record(Invocation::Piped {
            producer: producer.to_string(),
            consumer: consumer.to_string(),
        });
        Box::pin(async move { res })
    }

    fn reap_background(&mut self) -> usize {
        self.recorded.lock().unwrap().reap_calls += 1;
        0
    }
}
