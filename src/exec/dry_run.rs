// src/exec/dry_run.rs

//! Backend that prints planned invocations instead of spawning processes.

use std::io::Write;

use crate::errors::Result;
use crate::exec::argv::CommandLine;
use crate::exec::backend::{BackendFuture, ProcessBackend};
use crate::types::ExecMode;

/// Writes one line per invocation to `out`, e.g.
/// `SINGLE: echo ["hi"]` or `PIPED: printf [] | wc ["-c"]`.
#[derive(Debug)]
pub struct DryRunBackend<W = std::io::Stdout> {
    out: W,
}

impl DryRunBackend {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> DryRunBackend<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print(&mut self, mode: ExecMode, commands: &[&str]) -> Result<()> {
        let rendered: Vec<String> = commands.iter().map(|c| describe(c)).collect();
        writeln!(self.out, "{mode}: {}", rendered.join(" | "))?;
        Ok(())
    }
}

fn describe(line: &str) -> String {
    match CommandLine::parse(line) {
        Some(cmd) => format!("{} {:?}", cmd.program, cmd.args),
        None => "<invalid command>".to_string(),
    }
}

impl<W: Write + Send> ProcessBackend for DryRunBackend<W> {
    fn run_single<'a>(&'a mut self, command: &'a str) -> BackendFuture<'a> {
        let res = self.print(ExecMode::Single, &[command]);
        Box::pin(async move { res })
    }

    fn run_background<'a>(&'a mut self, command: &'a str) -> BackendFuture<'a> {
        let res = self.print(ExecMode::Concurrent, &[command]);
        Box::pin(async move { res })
    }

    fn run_piped<'a>(&'a mut self, producer: &'a str, consumer: &'a str) -> BackendFuture<'a> {
        let res = self.print(ExecMode::Piped, &[producer, consumer]);
        Box::pin(async move { res })
    }

    fn reap_background(&mut self) -> usize {
        0
    }
}
