// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for turning assembled invocations into OS
//! processes with `tokio::process::Command`.
//!
//! - [`argv`] splits a command line into program and arguments.
//! - [`backend`] provides the `ProcessBackend` trait the session talks to,
//!   which tests can replace with a fake implementation.
//! - [`orchestrator`] is the real backend: synchronous, background and
//!   piped execution plus the non-blocking background reap sweep.
//! - [`dry_run`] prints what would run, for `--dry-run`.

pub mod argv;
pub mod backend;
pub mod dry_run;
pub mod orchestrator;

pub use argv::CommandLine;
pub use backend::{BackendFuture, ProcessBackend};
pub use dry_run::DryRunBackend;
pub use orchestrator::ProcessOrchestrator;
