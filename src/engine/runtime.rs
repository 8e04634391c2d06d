// src/engine/runtime.rs

use std::fmt;

use tokio::io::AsyncRead;
use tracing::{debug, info};

use crate::buffer::ElementReader;
use crate::config::SessionConfig;
use crate::errors::Result;
use crate::exec::ProcessBackend;

use super::core::Dispatcher;
use super::{LineEvent, SessionEnd};

/// Reads lines from a byte source, feeds them to the dispatcher core, and
/// delegates process work to a `ProcessBackend`.
///
/// This is the IO shell around `Dispatcher`, which holds all the dispatch
/// semantics. The session owns the ring buffer, the end-of-stream flag and
/// the backend for its whole lifetime; all of them are released when it is
/// dropped, on success and error paths alike.
pub struct Session<R, B: ProcessBackend> {
    reader: ElementReader<R>,
    core: Dispatcher,
    backend: B,
}

impl<R, B: ProcessBackend> fmt::Debug for Session<R, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<R: AsyncRead + Unpin, B: ProcessBackend> Session<R, B> {
    /// Allocate the session's ring buffer. Fails on a zero capacity or if
    /// the allocation itself fails.
    pub fn new(source: R, config: &SessionConfig, backend: B) -> Result<Self> {
        let reader = ElementReader::new(source, config.capacity)?;
        Ok(Self {
            reader,
            core: Dispatcher::new(config.termination_token.clone()),
            backend,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Main loop.
    ///
    /// - Reaps finished background children (never blocks).
    /// - Pulls the next line, waiting for more input if needed.
    /// - Feeds it into the core and executes the resulting invocation before
    ///   reading further.
    ///
    /// Returns how the session ended; errors are fatal (read failure, pipe
    /// creation or process spawn failure).
    pub async fn run(&mut self) -> Result<SessionEnd> {
        info!(capacity = self.reader.capacity(), "session started");

        loop {
            let reaped = self.backend.reap_background();
            if reaped > 0 {
                debug!(reaped, "collected finished background children");
            }

            let event = match self.reader.next_line().await? {
                Some(line) => LineEvent::Line(line),
                None => LineEvent::EndOfStream,
            };
            debug!(?event, "session read line");

            let step = self.core.step(event);

            if let Some(invocation) = step.invocation {
                debug!(mode = %invocation.mode(), "dispatching invocation");
                self.backend.execute(&invocation).await?;
                self.core.execution_finished();
            }

            if !step.keep_running {
                let end = step.end.unwrap_or(SessionEnd::EndOfStream);
                info!(?end, "session finished");
                return Ok(end);
            }
        }
    }
}
