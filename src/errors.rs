// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskwireError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Cycle detected in task graph: {0}")]
    TaskCycle(String),

    #[error("Invalid distribution tag: {0}")]
    InvalidTag(String),

    /// The package directory exists but carries no manifest. Never retried.
    #[error("\"{}\" does not have a {manifest}.", .dir.display())]
    MissingManifest { dir: PathBuf, manifest: String },

    #[error("{message} (`npm whoami` exited with status {code})")]
    NotAuthenticated { message: String, code: i32 },

    #[error("`{command}` exited with status {code}")]
    ProcessFailed { command: String, code: i32 },

    #[error("Component did not publish, status: {code}.")]
    PublishFailed { code: i32 },

    /// One or more constituents of a composite task failed.
    #[error("task '{task}' failed: {}", summarize_failures(.failures))]
    AggregateFailed {
        task: String,
        failures: Vec<(String, String)>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskwireError {
    /// Names of the failed constituents, for aggregate failures.
    pub fn failed_tasks(&self) -> Vec<&str> {
        match self {
            TaskwireError::AggregateFailed { failures, .. } => {
                failures.iter().map(|(name, _)| name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn summarize_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(name, reason)| format!("[{name}] {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, TaskwireError>;
