// src/publish/package.rs

use std::path::PathBuf;

use tracing::{info, warn};

use crate::errors::{Result, TaskwireError};
use crate::exec::{OutputMode, ProcessRunner, ProcessSpec, WorkingDirGuard};
use crate::fs::FileSystem;
use crate::types::PublishOutcome;

/// Everything needed to publish one package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub package_dir: PathBuf,
    pub manifest: String,
    pub npm: String,
    pub access: String,
    pub tag: Option<String>,
    pub dry: bool,
}

/// `publish --access <access> [--tag <tag>]`
pub fn publish_args(access: &str, tag: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "publish".to_string(),
        "--access".to_string(),
        access.to_string(),
    ];
    if let Some(tag) = tag {
        args.push("--tag".to_string());
        args.push(tag.to_string());
    }
    args
}

/// Publish `req.package_dir` to the registry.
///
/// - Missing package directory: nothing to publish, succeeds as a no-op.
/// - Missing manifest: `MissingManifest`, regardless of `dry`.
/// - `dry`: every check runs, npm is never spawned.
/// - Otherwise npm's exit code decides; non-zero becomes `PublishFailed`.
///
/// The process working directory is switched to the package directory for
/// the duration of the attempt and restored afterwards on every path. Failing
/// to switch back is an error even when npm succeeded.
pub async fn publish_package(
    req: &PublishRequest,
    fs: &dyn FileSystem,
    runner: &dyn ProcessRunner,
) -> Result<PublishOutcome> {
    if !fs.is_dir(&req.package_dir) {
        // Not an error; see `PublishOutcome::NothingToPublish`.
        warn!(dir = %req.package_dir.display(), "package directory not found; nothing to publish");
        return Ok(PublishOutcome::NothingToPublish);
    }

    if !fs.is_file(&req.package_dir.join(&req.manifest)) {
        return Err(TaskwireError::MissingManifest {
            dir: req.package_dir.clone(),
            manifest: req.manifest.clone(),
        });
    }

    let cwd = WorkingDirGuard::enter(&req.package_dir)?;
    let outcome = run_in_package_dir(req, runner).await;
    let restored = cwd.restore();
    let outcome = outcome?;
    restored?;
    Ok(outcome)
}

async fn run_in_package_dir(
    req: &PublishRequest,
    runner: &dyn ProcessRunner,
) -> Result<PublishOutcome> {
    info!("Publishing component...");

    let spec = ProcessSpec::new(&req.npm, publish_args(&req.access, req.tag.as_deref()))
        .in_dir(&req.package_dir);
    info!("  Executing \"{spec}\"...");

    if req.dry {
        info!("dry run; skipping npm publish");
        return Ok(PublishOutcome::DryRun);
    }

    let output = runner.run(&spec, OutputMode::Stream).await?;
    if output.success() {
        info!(dir = %req.package_dir.display(), "component published");
        Ok(PublishOutcome::Published)
    } else {
        Err(TaskwireError::PublishFailed { code: output.code })
    }
}
