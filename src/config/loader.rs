// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::ConfigFile;
use crate::config::validate::validate_config;
use crate::errors::{Result, TaskwireError};

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: ConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Resolve the effective config and the project root it applies to.
///
/// - An explicit path must exist.
/// - Without one, `Taskwire.toml` in the current directory is used if present,
///   otherwise the built-in defaults.
///
/// The project root is the directory containing the config file; for a bare
/// filename (or no file at all) it is the current working directory.
pub fn resolve_config(explicit: Option<&str>) -> Result<(ConfigFile, PathBuf)> {
    let path = match explicit {
        Some(p) => {
            let path = PathBuf::from(p);
            if !path.is_file() {
                return Err(TaskwireError::ConfigError(format!(
                    "config file {:?} does not exist",
                    path
                )));
            }
            Some(path)
        }
        None => {
            let path = default_config_path();
            path.is_file().then_some(path)
        }
    };

    match path {
        Some(path) => {
            info!(config = %path.display(), "loading config");
            let cfg = load_and_validate(&path)?;
            Ok((cfg, config_root_dir(&path)?))
        }
        None => {
            debug!("no config file found; using built-in defaults");
            let cfg = ConfigFile::default();
            validate_config(&cfg)?;
            Ok((cfg, std::env::current_dir()?))
        }
    }
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskwire.toml")
}

/// Directory containing the config file, made absolute so later working
/// directory changes don't affect path resolution.
fn config_root_dir(config_path: &Path) -> Result<PathBuf> {
    let root = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => return Ok(std::env::current_dir()?),
    };
    Ok(fs::canonicalize(root)?)
}
