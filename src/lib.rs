// src/lib.rs

pub mod buffer;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod sum;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, CliCommand};
use crate::config::SessionConfig;
use crate::engine::Session;
use crate::exec::{DryRunBackend, ProcessOrchestrator};

/// High-level entry point used by `main.rs`.
///
/// Without a subcommand this runs the interpreter on stdin until the
/// termination token or end of input. Any returned error maps to exit
/// status 1.
pub async fn run(args: CliArgs) -> Result<()> {
    if let Some(CliCommand::Sum {
        format,
        path,
        buffer_size,
    }) = args.command
    {
        let total = sum::sum_file(&path, format.into(), buffer_size).await?;
        println!("{total}");
        return Ok(());
    }

    let config = SessionConfig::default();
    let stdin = tokio::io::stdin();

    let end = if args.dry_run {
        let mut session = Session::new(stdin, &config, DryRunBackend::stdout())?;
        session.run().await?
    } else {
        let mut session = Session::new(stdin, &config, ProcessOrchestrator::new())?;
        let end = session.run().await?;
        debug!(
            still_running = session.backend().background_count(),
            "background children left to the OS"
        );
        end
    };

    info!(?end, "ringsh exiting");
    Ok(())
}
