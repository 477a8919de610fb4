#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use taskwire::config::{CommandConfig, ConfigFile, validate_config};
use taskwire::exec::ProcessRunner;
use taskwire::fs::FileSystem;
use taskwire::tasks::{TaskContext, TaskRegistry, TaskRunner};
use taskwire::types::RunFlags;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
        }
    }

    pub fn dist_root(mut self, dir: &str) -> Self {
        self.config.project.dist_root = dir.to_string();
        self
    }

    pub fn package_dir(mut self, dir: &str) -> Self {
        self.config.project.package_dir = dir.to_string();
        self
    }

    pub fn spec_glob(mut self, glob: &str) -> Self {
        self.config.release.spec_glob = glob.to_string();
        self
    }

    pub fn tslint(mut self, cmd: &str, args: &[&str]) -> Self {
        self.config.lint.tslint = plain(cmd, args);
        self
    }

    pub fn stylelint(mut self, cmd: &str, args: &[&str]) -> Self {
        self.config.lint.stylelint = plain(cmd, args);
        self
    }

    pub fn compile(mut self, cmd: &str, args: &[&str]) -> Self {
        self.config.release.compile = plain(cmd, args);
        self
    }

    pub fn build(self) -> ConfigFile {
        validate_config(&self.config).expect("Failed to build valid config from builder");
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn plain(cmd: &str, args: &[&str]) -> CommandConfig {
    CommandConfig {
        cmd: cmd.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        node: false,
    }
}

/// A throwaway project directory on the real filesystem.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("creating temp project dir"),
        }
    }

    /// Canonical root, so it compares equal to `std::env::current_dir()`.
    pub fn root(&self) -> PathBuf {
        std::fs::canonicalize(self.dir.path()).expect("canonicalizing temp dir")
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        write_file(&path, contents);
        path
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(&path).expect("creating dir");
        path
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("creating parent dir");
    }
    std::fs::write(path, contents).expect("writing file");
}

/// A runner over the standard registry.
pub fn standard_runner(
    cfg: ConfigFile,
    root: impl Into<PathBuf>,
    flags: RunFlags,
    fs: Arc<dyn FileSystem>,
    processes: Arc<dyn ProcessRunner>,
) -> TaskRunner {
    let registry = TaskRegistry::standard(&cfg).expect("standard registry is valid");
    let ctx = TaskContext {
        root: root.into(),
        config: cfg,
        flags,
    };
    TaskRunner::new(registry, ctx, fs, processes)
}
