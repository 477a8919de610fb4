// src/release/clean.rs

use std::path::Path;

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::FileSystem;

/// Remove `dir` and everything below it.
///
/// A missing directory is not an error. Returns whether anything was removed.
pub fn clean_dir(fs: &dyn FileSystem, dir: &Path) -> Result<bool> {
    if !fs.exists(dir) {
        debug!(dir = %dir.display(), "nothing to clean");
        return Ok(false);
    }

    if fs.is_dir(dir) {
        fs.remove_dir_all(dir)?;
    } else {
        fs.remove_file(dir)?;
    }
    info!(dir = %dir.display(), "removed build output");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn removes_existing_tree() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/dist/a.js", b"a");
        fs.add_file("/proj/src/a.ts", b"a");

        assert!(clean_dir(&fs, Path::new("/proj/dist")).unwrap());
        assert!(!fs.exists(Path::new("/proj/dist/a.js")));
        assert!(fs.exists(Path::new("/proj/src/a.ts")));
    }

    #[test]
    fn removes_empty_dir() {
        let fs = MockFileSystem::new();
        fs.add_dir("/proj/dist");
        assert!(clean_dir(&fs, Path::new("/proj/dist")).unwrap());
        assert!(!fs.exists(Path::new("/proj/dist")));
    }

    #[test]
    fn missing_dir_is_fine() {
        let fs = MockFileSystem::new();
        assert!(!clean_dir(&fs, Path::new("/proj/dist")).unwrap());
    }
}
