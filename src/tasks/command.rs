// src/tasks/command.rs

use std::path::Path;

use tracing::debug;

use crate::config::model::{CommandConfig, ProjectSection};
use crate::exec::ProcessSpec;
use crate::fs::FileSystem;

/// Build the invocation for a configured command, run from the project root.
///
/// `node = true` commands prefer the project-local binary under
/// `project.node_bin_dir` and fall back to whatever is on `PATH`.
pub fn resolve_command(
    command: &CommandConfig,
    project: &ProjectSection,
    root: &Path,
    fs: &dyn FileSystem,
) -> ProcessSpec {
    let program = if command.node {
        let local = root.join(&project.node_bin_dir).join(&command.cmd);
        if fs.is_file(&local) {
            debug!(cmd = %command.cmd, path = %local.display(), "using project-local binary");
            local.display().to_string()
        } else {
            command.cmd.clone()
        }
    } else {
        command.cmd.clone()
    };

    ProcessSpec::new(program, command.args.clone()).in_dir(root)
}
