// src/config/validate.rs

use std::path::Path;

use globset::Glob;

use crate::config::model::{CommandConfig, ConfigFile};
use crate::errors::{Result, TaskwireError};

/// Validate a loaded config.
///
/// Checks:
/// - every configured command has a non-empty `cmd`,
/// - project paths are non-empty and the package dir is not the dist root,
/// - `release.spec_glob` compiles,
/// - `publish.access` is `public` or `restricted`.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_commands(cfg)?;
    validate_paths(cfg)?;
    validate_spec_glob(&cfg.release.spec_glob)?;
    validate_publish(cfg)?;
    Ok(())
}

fn validate_commands(cfg: &ConfigFile) -> Result<()> {
    let commands: [(&str, &CommandConfig); 3] = [
        ("lint.tslint", &cfg.lint.tslint),
        ("lint.stylelint", &cfg.lint.stylelint),
        ("release.compile", &cfg.release.compile),
    ];

    for (section, command) in commands {
        if command.cmd.trim().is_empty() {
            return Err(TaskwireError::ConfigError(format!(
                "[{section}].cmd must not be empty"
            )));
        }
    }

    if cfg.publish.npm.trim().is_empty() {
        return Err(TaskwireError::ConfigError(
            "[publish].npm must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_paths(cfg: &ConfigFile) -> Result<()> {
    let project = &cfg.project;
    for (key, value) in [
        ("dist_root", &project.dist_root),
        ("package_dir", &project.package_dir),
        ("node_bin_dir", &project.node_bin_dir),
    ] {
        if value.trim().is_empty() {
            return Err(TaskwireError::ConfigError(format!(
                "[project].{key} must not be empty"
            )));
        }
    }

    if Path::new(&project.package_dir) == Path::new(&project.dist_root) {
        return Err(TaskwireError::ConfigError(format!(
            "[project].package_dir must be inside dist_root, not equal to it ({:?})",
            project.dist_root
        )));
    }

    if cfg.publish.manifest.trim().is_empty() {
        return Err(TaskwireError::ConfigError(
            "[publish].manifest must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_spec_glob(pattern: &str) -> Result<()> {
    Glob::new(pattern).map_err(|e| {
        TaskwireError::ConfigError(format!("[release].spec_glob {pattern:?} is invalid: {e}"))
    })?;
    Ok(())
}

fn validate_publish(cfg: &ConfigFile) -> Result<()> {
    match cfg.publish.access.as_str() {
        "public" | "restricted" => Ok(()),
        other => Err(TaskwireError::ConfigError(format!(
            "[publish].access must be \"public\" or \"restricted\" (got {other:?})"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        validate_config(&ConfigFile::default()).unwrap();
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut cfg = ConfigFile::default();
        cfg.lint.stylelint.cmd = "  ".to_string();

        match validate_config(&cfg) {
            Err(TaskwireError::ConfigError(msg)) => assert!(msg.contains("lint.stylelint")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn bad_glob_is_rejected() {
        let mut cfg = ConfigFile::default();
        cfg.release.spec_glob = "dist/**/[.spec".to_string();
        assert!(matches!(
            validate_config(&cfg),
            Err(TaskwireError::ConfigError(_))
        ));
    }

    #[test]
    fn unknown_access_is_rejected() {
        let mut cfg = ConfigFile::default();
        cfg.publish.access = "private".to_string();

        match validate_config(&cfg) {
            Err(TaskwireError::ConfigError(msg)) => assert!(msg.contains("private")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn package_dir_equal_to_dist_root_is_rejected() {
        let mut cfg = ConfigFile::default();
        cfg.project.package_dir = "dist".to_string();
        assert!(validate_config(&cfg).is_err());
    }
}
