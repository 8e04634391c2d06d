#![allow(dead_code)]

pub use ringsh_test_utils::chunked_reader::ChunkedReader;
pub use ringsh_test_utils::fake_backend::{Recorded, RecordingBackend};
pub use ringsh_test_utils::{init_tracing, with_timeout};

use ringsh::config::SessionConfig;
use ringsh::engine::{Session, SessionEnd};
use ringsh::errors::Result;

/// Run a whole session over `input` (delivered `chunk` bytes per read) with
/// a recording backend, returning how it ended and what it recorded.
pub async fn run_recorded(
    input: &str,
    config: &SessionConfig,
    chunk: usize,
    backend: RecordingBackend,
) -> (Result<SessionEnd>, Recorded) {
    let recorded = backend.recorded();
    let source = ChunkedReader::new(input.as_bytes(), chunk);
    let mut session = Session::new(source, config, backend).expect("session allocation");
    let end = with_timeout(session.run()).await;
    let snapshot = recorded.lock().unwrap().clone();
    (end, snapshot)
}
