// src/tasks/mod.rs

//! Named tasks and the runner that executes them.
//!
//! - [`registry`] declares every task (`lint`, `build:release`, `publish`, ...)
//!   and what it consists of.
//! - [`graph`] checks that a registry only references known tasks and has no
//!   cycles.
//! - [`command`] turns configured commands into process invocations.
//! - [`runner`] executes tasks in their fixed order.

pub mod command;
pub mod graph;
pub mod registry;
pub mod runner;

pub use registry::{Builtin, TaskDef, TaskKind, TaskRegistry};
pub use runner::{TaskContext, TaskRunner};
