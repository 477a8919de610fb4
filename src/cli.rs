// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::RunFlags;

/// Command-line arguments for `taskwire`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskwire",
    version,
    about = "Lint, build and publish a component package.",
    long_about = None
)]
pub struct CliArgs {
    /// Tasks to run, in order (e.g. `lint`, `build:release`, `publish`).
    #[arg(value_name = "TASK", required_unless_present = "list")]
    pub tasks: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// If omitted, `Taskwire.toml` in the current directory is used when it
    /// exists; otherwise the built-in defaults apply.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Perform every check but skip the actual `npm publish`.
    #[arg(long)]
    pub dry: bool,

    /// Publish under this distribution tag instead of `latest`.
    #[arg(long, value_name = "LABEL")]
    pub tag: Option<String>,

    /// Print the registered tasks and their commands, then exit.
    #[arg(long)]
    pub list: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKWIRE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Flags that change how individual tasks behave.
    pub fn run_flags(&self) -> RunFlags {
        RunFlags {
            dry: self.dry,
            tag: self.tag.clone(),
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
