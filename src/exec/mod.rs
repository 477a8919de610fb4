// src/exec/mod.rs

//! Process execution layer.
//!
//! Every external tool (linters, compiler, npm) is run through here, using
//! `tokio::process::Command`.
//!
//! - [`process`] defines the invocation record and the real spawn/stream/wait
//!   primitive.
//! - [`output`] splits raw child output into lines and formats them for echo.
//! - [`backend`] provides the `ProcessRunner` trait and the concrete
//!   `RealProcessRunner`; tests substitute a fake.
//! - [`cwd`] owns the scoped working-directory guard used around publishing.

pub mod backend;
pub mod cwd;
pub mod output;
pub mod process;

pub use backend::{ProcessRunner, RealProcessRunner};
pub use cwd::WorkingDirGuard;
pub use process::{OutputMode, ProcessOutput, ProcessSpec, run_process};
