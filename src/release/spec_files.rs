// src/release/spec_files.rs

use std::path::{Path, PathBuf};

use globset::Glob;
use tracing::{debug, info};

use crate::errors::{Result, TaskwireError};
use crate::fs::{FileSystem, walk_files};

/// Delete every file under `root/dist_root` whose root-relative path matches
/// `pattern` (e.g. `dist/**/*.spec.*`). Returns the removed paths.
pub fn strip_spec_files(
    fs: &dyn FileSystem,
    root: &Path,
    dist_root: &str,
    pattern: &str,
) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .map_err(|e| TaskwireError::ConfigError(format!("invalid spec glob {pattern:?}: {e}")))?
        .compile_matcher();

    let dist = root.join(dist_root);
    if !fs.is_dir(&dist) {
        debug!(dir = %dist.display(), "no build output to strip");
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for file in walk_files(fs, &dist)? {
        let Ok(relative) = file.strip_prefix(root) else {
            continue;
        };
        // Glob patterns always use forward slashes.
        let relative = relative.to_string_lossy().replace('\\', "/");
        if matcher.is_match(&relative) {
            fs.remove_file(&file)?;
            debug!(file = %relative, "removed spec file");
            removed.push(file);
        }
    }

    info!(count = removed.len(), pattern, "stripped spec files");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn removes_only_matching_files() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/dist/button.js", b"");
        fs.add_file("/proj/dist/button.spec.js", b"");
        fs.add_file("/proj/dist/core/ripple.spec.d.ts", b"");
        fs.add_file("/proj/dist/core/ripple.js", b"");
        fs.add_file("/proj/src/button.spec.ts", b"");

        let removed =
            strip_spec_files(&fs, Path::new("/proj"), "dist", "dist/**/*.spec.*").unwrap();

        assert_eq!(
            removed,
            vec![
                PathBuf::from("/proj/dist/button.spec.js"),
                PathBuf::from("/proj/dist/core/ripple.spec.d.ts"),
            ]
        );
        assert_eq!(
            fs.file_paths(),
            vec![
                PathBuf::from("/proj/dist/button.js"),
                PathBuf::from("/proj/dist/core/ripple.js"),
                PathBuf::from("/proj/src/button.spec.ts"),
            ]
        );
    }

    #[test]
    fn missing_dist_is_a_no_op() {
        let fs = MockFileSystem::new();
        let removed =
            strip_spec_files(&fs, Path::new("/proj"), "dist", "dist/**/*.spec.*").unwrap();
        assert!(removed.is_empty());
    }
}
