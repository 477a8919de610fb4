// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod publish;
pub mod release;
pub mod tasks;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::model::ConfigFile;
use crate::config::resolve_config;
use crate::errors::{Result, TaskwireError};
use crate::exec::RealProcessRunner;
use crate::fs::RealFileSystem;
use crate::publish::validate_tag;
use crate::tasks::{TaskContext, TaskKind, TaskRegistry, TaskRunner};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (or built-in defaults)
/// - the standard task registry
/// - flag validation
/// - the runner, with the real filesystem and process backends
///
/// Requested tasks run one after another; the first failure stops the run.
pub async fn run(args: CliArgs) -> Result<()> {
    let (cfg, root) = resolve_config(args.config.as_deref())?;
    let registry = TaskRegistry::standard(&cfg)?;

    if args.list {
        print_task_list(&registry, &cfg, &root);
        return Ok(());
    }

    let flags = args.run_flags();
    if let Some(tag) = &flags.tag {
        validate_tag(tag)?;
    }

    // Reject typos before anything has side effects.
    for name in &args.tasks {
        if registry.get(name).is_none() {
            return Err(TaskwireError::TaskNotFound(name.clone()));
        }
    }

    info!(root = %root.display(), tasks = ?args.tasks, dry = flags.dry, "running tasks");

    let ctx = TaskContext {
        root,
        config: cfg,
        flags,
    };
    let runner = TaskRunner::new(
        registry,
        ctx,
        Arc::new(RealFileSystem),
        Arc::new(RealProcessRunner::new()),
    );

    for name in &args.tasks {
        runner.run(name).await?;
    }

    Ok(())
}

/// `--list` output: every task, what it runs, and the resolved paths.
fn print_task_list(registry: &TaskRegistry, cfg: &ConfigFile, root: &Path) {
    println!("taskwire tasks");
    println!("  root = {}", root.display());
    println!("  project.dist_root = {}", cfg.project.dist_root);
    println!("  project.package_dir = {}", cfg.project.package_dir);
    println!("  release.spec_glob = {}", cfg.release.spec_glob);
    println!();

    for task in registry.tasks() {
        println!("  - {}", task.name);
        if !task.description.is_empty() {
            println!("      {}", task.description);
        }
        match &task.kind {
            TaskKind::Exec(command) => println!("      cmd: {}", command.display()),
            TaskKind::Sequence(steps) => println!("      sequence: {}", steps.join(" -> ")),
            TaskKind::Aggregate(parts) => println!("      all of: {}", parts.join(", ")),
            TaskKind::Builtin(builtin) => println!("      builtin: {builtin:?}"),
            TaskKind::PublishFlow {
                auth,
                build,
                publish,
            } => println!("      flow: {auth} -> {build} -> {publish}"),
        }
    }

    debug!("task list complete (no execution)");
}
