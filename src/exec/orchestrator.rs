// src/exec/orchestrator.rs

//! Real process backend: spawns, connects and waits on OS processes.

use std::io::ErrorKind;
use std::process::ExitStatus;

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::errors::{Result, ShellError};
use crate::exec::argv::CommandLine;
use crate::exec::backend::{BackendFuture, ProcessBackend};

/// A spawned child plus what we need to talk about it in logs.
#[derive(Debug)]
struct Launched {
    program: String,
    pid: Option<u32>,
    child: Child,
}

impl Launched {
    /// Wait for exit. The status is logged and otherwise discarded.
    async fn wait(mut self) -> Option<ExitStatus> {
        match self.child.wait().await {
            Ok(status) => {
                debug!(
                    program = %self.program,
                    pid = ?self.pid,
                    exit_code = ?status.code(),
                    success = status.success(),
                    "child exited"
                );
                Some(status)
            }
            Err(err) => {
                warn!(program = %self.program, pid = ?self.pid, error = %err, "failed to wait for child");
                None
            }
        }
    }
}

/// Production [`ProcessBackend`].
///
/// - Children inherit stdin/stdout/stderr unless piped mode redirects them.
/// - Background children are owned here until a reap sweep sees them exit.
///   They are never killed, not even when the orchestrator is dropped.
#[derive(Debug, Default)]
pub struct ProcessOrchestrator {
    background: Vec<Launched>,
}

impl ProcessOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background children spawned and not yet reaped.
    pub fn background_count(&self) -> usize {
        self.background.len()
    }

    async fn single(line: &str) -> Result<()> {
        let Some(cmd) = parse_or_report(line) else {
            return Ok(());
        };
        info!(program = %cmd.program, args = ?cmd.args, "running command");

        if let Some(launched) = spawn(build_command(&cmd), &cmd.program)? {
            launched.wait().await;
        }
        Ok(())
    }

    fn background(&mut self, line: &str) -> Result<()> {
        let Some(cmd) = parse_or_report(line) else {
            return Ok(());
        };
        info!(program = %cmd.program, args = ?cmd.args, "starting background command");

        if let Some(launched) = spawn(build_command(&cmd), &cmd.program)? {
            debug!(program = %launched.program, pid = ?launched.pid, "background child running");
            self.background.push(launched);
        }
        Ok(())
    }

    /// Both pipe ends live inside the `Command`s, which `spawn` consumes, so
    /// the parent holds neither end once both children exist. Early returns
    /// drop whatever end is still owned here.
    async fn piped(producer: &str, consumer: &str) -> Result<()> {
        let (reader, writer) = std::io::pipe().map_err(ShellError::Pipe)?;

        let first = match parse_or_report(producer) {
            Some(cmd) => {
                info!(program = %cmd.program, args = ?cmd.args, "starting pipe producer");
                let mut command = build_command(&cmd);
                command.stdout(writer);
                spawn(command, &cmd.program)?
            }
            None => {
                drop(writer);
                None
            }
        };

        let second = match parse_or_report(consumer) {
            Some(cmd) => {
                info!(program = %cmd.program, args = ?cmd.args, "starting pipe consumer");
                let mut command = build_command(&cmd);
                command.stdin(reader);
                match spawn(command, &cmd.program) {
                    Ok(launched) => launched,
                    Err(err) => {
                        if let Some(first) = first {
                            first.wait().await;
                        }
                        return Err(err);
                    }
                }
            }
            None => {
                drop(reader);
                None
            }
        };

        tokio::join!(wait_opt(first), wait_opt(second));
        Ok(())
    }
}

impl ProcessBackend for ProcessOrchestrator {
    fn run_single<'a>(&'a mut self, command: &'a str) -> BackendFuture<'a> {
        Box::pin(Self::single(command))
    }

    fn run_background<'a>(&'a mut self, command: &'a str) -> BackendFuture<'a> {
        let res = self.background(command);
        Box::pin(async move { res })
    }

    fn run_piped<'a>(&'a mut self, producer: &'a str, consumer: &'a str) -> BackendFuture<'a> {
        Box::pin(Self::piped(producer, consumer))
    }

    fn reap_background(&mut self) -> usize {
        let before = self.background.len();
        self.background.retain_mut(|bg| match bg.child.try_wait() {
            Ok(Some(status)) => {
                debug!(
                    program = %bg.program,
                    pid = ?bg.pid,
                    exit_code = ?status.code(),
                    "reaped background child"
                );
                false
            }
            Ok(None) => true,
            Err(err) => {
                warn!(program = %bg.program, pid = ?bg.pid, error = %err, "failed to poll background child; dropping handle");
                false
            }
        });
        before - self.background.len()
    }
}

fn build_command(cmd: &CommandLine) -> Command {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args);
    command
}

fn parse_or_report(line: &str) -> Option<CommandLine> {
    let cmd = CommandLine::parse(line);
    if cmd.is_none() {
        eprintln!("ringsh: invalid command");
        debug!(line, "command line has no program");
    }
    cmd
}

/// Spawn `command`, consuming it so that any stdio handles it holds are
/// closed in the parent when this returns.
///
/// - `Ok(Some(_))`: the child is running.
/// - `Ok(None)`: the program could not be found or executed. A diagnostic
///   went to stderr; callers treat this like a child that exited nonzero.
/// - `Err(Spawn)`: the OS could not create a process at all (see
///   [`is_resource_exhaustion`]).
fn spawn(mut command: Command, program: &str) -> Result<Option<Launched>> {
    match command.spawn() {
        Ok(child) => {
            let pid = child.id();
            debug!(program, pid = ?pid, "spawned child");
            Ok(Some(Launched {
                program: program.to_string(),
                pid,
                child,
            }))
        }
        Err(source) if is_resource_exhaustion(&source) => Err(ShellError::Spawn {
            program: program.to_string(),
            source,
        }),
        Err(err) => {
            eprintln!("ringsh: {program}: {err}");
            debug!(program, error = %err, "program could not be executed");
            Ok(None)
        }
    }
}

/// Too many open files in this process / on the system.
#[cfg(unix)]
const FD_EXHAUSTION_CODES: [i32; 2] = [24, 23];
#[cfg(not(unix))]
const FD_EXHAUSTION_CODES: [i32; 0] = [];

/// Errors where the OS could not create a process at all (out of memory,
/// process or descriptor limits). Anything else means the target program
/// itself cannot run.
fn is_resource_exhaustion(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::WouldBlock | ErrorKind::OutOfMemory | ErrorKind::Unsupported
    ) || err
        .raw_os_error()
        .is_some_and(|code| FD_EXHAUSTION_CODES.contains(&code))
}

async fn wait_opt(launched: Option<Launched>) -> Option<ExitStatus> {
    match launched {
        Some(launched) => launched.wait().await,
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_resource_exhaustion_is_fatal() {
        assert!(is_resource_exhaustion(&std::io::Error::from(ErrorKind::OutOfMemory)));
        assert!(is_resource_exhaustion(&std::io::Error::from(ErrorKind::WouldBlock)));

        for kind in [
            ErrorKind::NotFound,
            ErrorKind::PermissionDenied,
            ErrorKind::InvalidInput,
            ErrorKind::NotADirectory,
            ErrorKind::ExecutableFileBusy,
            ErrorKind::InvalidFilename,
            ErrorKind::ArgumentListTooLong,
        ] {
            assert!(!is_resource_exhaustion(&std::io::Error::from(kind)), "{kind:?}");
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn raw_exec_errors_are_not_fatal() {
        // ENOEXEC, ENOTDIR, ELOOP
        for code in [8, 20, 40] {
            assert!(!is_resource_exhaustion(&std::io::Error::from_raw_os_error(code)), "errno {code}");
        }
        // EMFILE, ENFILE
        for code in [24, 23] {
            assert!(is_resource_exhaustion(&std::io::Error::from_raw_os_error(code)), "errno {code}");
        }
    }

    #[tokio::test]
    async fn missing_program_is_not_fatal() {
        let mut orch = ProcessOrchestrator::new();
        orch.run_single("ringsh-test-no-such-program-7f3a")
            .await
            .unwrap();
        orch.run_background("ringsh-test-no-such-program-7f3a")
            .await
            .unwrap();
        assert_eq!(orch.background_count(), 0);
    }

    #[tokio::test]
    async fn blank_command_is_skipped() {
        let mut orch = ProcessOrchestrator::new();
        orch.run_single("   ").await.unwrap();
        orch.run_piped("", "").await.unwrap();
        assert_eq!(orch.reap_background(), 0);
    }
}
