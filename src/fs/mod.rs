// src/fs/mod.rs

//! Filesystem abstraction used by the `clean`, spec-stripping and publish
//! steps, so they can be exercised against [`mock::MockFileSystem`].

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove a directory and everything under it.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        fs::write(path, contents).with_context(|| format!("writing to file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).with_context(|| format!("removing file {:?}", path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).with_context(|| format!("removing dir {:?}", path))
    }
}

/// Collect every file below `root`, depth first.
///
/// Symlinked directories are not followed by [`RealFileSystem`] beyond what
/// `Path::is_dir` reports.
pub fn walk_files(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs.read_dir(&dir)? {
            if fs.is_dir(&entry) {
                pending.push(entry);
            } else if fs.is_file(&entry) {
                files.push(entry);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::mock::MockFileSystem;
    use super::*;

    #[test]
    fn walk_files_descends_into_subdirectories() {
        let fs = MockFileSystem::new();
        fs.add_file("dist/a.js", b"a");
        fs.add_file("dist/lib/b.js", b"b");
        fs.add_file("dist/lib/deep/c.js", b"c");
        fs.add_file("src/ignored.ts", b"x");

        let files = walk_files(&fs, Path::new("dist")).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("dist/a.js"),
                PathBuf::from("dist/lib/b.js"),
                PathBuf::from("dist/lib/deep/c.js"),
            ]
        );
    }

    #[test]
    fn real_fs_walk_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        fs.write(&dir.path().join("out/x.spec.js"), b"x").unwrap();
        fs.write(&dir.path().join("out/y.js"), b"y").unwrap();

        let files = walk_files(&fs, &dir.path().join("out")).unwrap();
        assert_eq!(files.len(), 2);

        fs.remove_dir_all(&dir.path().join("out")).unwrap();
        assert!(!fs.exists(&dir.path().join("out")));
    }
}
