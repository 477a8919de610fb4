// src/types.rs

/// Name of a registered task, e.g. `"lint"` or `":publish:whoami"`.
pub type TaskName = String;

/// Flags parsed from the command line that individual tasks consult.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// Skip the real `npm publish` invocation.
    pub dry: bool,
    /// Distribution tag to publish under; `None` means npm's default (`latest`).
    pub tag: Option<String>,
}

/// How a single publish attempt resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The package directory did not exist, so there was nothing to publish.
    ///
    /// Kept for compatibility with the old build scripts, which silently
    /// skipped a missing output tree instead of reporting it.
    NothingToPublish,
    /// `--dry` was set; every check passed but npm was never invoked.
    DryRun,
    /// `npm publish` exited with status 0.
    Published,
}
