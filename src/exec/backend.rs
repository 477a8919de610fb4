// src/exec/backend.rs

//! Pluggable process runner abstraction.
//!
//! Tasks talk to a `ProcessRunner` instead of calling [`run_process`]
//! directly. Production uses `RealProcessRunner`; tests provide a runner that
//! records invocations and returns scripted exit codes, so pipelines can be
//! checked without linters or npm installed.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::process::{OutputMode, ProcessOutput, ProcessSpec, run_process};

/// Trait abstracting how external commands are executed.
pub trait ProcessRunner: Send + Sync {
    /// Run `spec` to completion.
    ///
    /// Implementations return `Ok` for any exit status; only failures to run
    /// the command at all are errors.
    fn run<'a>(
        &'a self,
        spec: &'a ProcessSpec,
        mode: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessOutput>> + Send + 'a>>;
}

/// Real runner: spawns OS processes via `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct RealProcessRunner;

impl RealProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for RealProcessRunner {
    fn run<'a>(
        &'a self,
        spec: &'a ProcessSpec,
        mode: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessOutput>> + Send + 'a>> {
        Box::pin(run_process(spec, mode))
    }
}
