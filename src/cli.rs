// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::sum::SumFormat;

/// Command-line arguments for `ringsh`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ringsh",
    version,
    about = "Read SINGLE / CONCURRENT / PIPED control lines from stdin and run the commands that follow them.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RINGSH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Parse control lines and print what would run, without spawning
    /// anything.
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Sum the integers stored in a file.
    Sum {
        /// How the file encodes its values.
        #[arg(value_enum)]
        format: SumFormatArg,

        /// File to read.
        path: PathBuf,

        /// Read buffer size in bytes (>= 1).
        buffer_size: usize,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum SumFormatArg {
    /// Native-endian 32-bit integers.
    Binary,
    /// Comma-separated decimal integers.
    Text,
}

impl From<SumFormatArg> for SumFormat {
    fn from(arg: SumFormatArg) -> Self {
        match arg {
            SumFormatArg::Binary => SumFormat::Binary,
            SumFormatArg::Text => SumFormat::Text,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
