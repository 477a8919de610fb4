// src/publish/tag.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{Result, TaskwireError};

/// Anything npm would parse as a version or range instead of a tag name.
///
/// A prerelease or build suffix only makes a version once all three numeric
/// parts are present; `2024-release` is a valid tag.
static VERSION_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[v=^~<>]*\d+(?:\.(?:\d+|x|\*)){0,2}|[v=^~<>]*\d+\.\d+\.\d+[-+].*)$")
        .expect("static regex is valid")
});

/// Check a `--tag` label before anything runs.
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.is_empty() {
        return Err(TaskwireError::InvalidTag(
            "tag must not be empty (use --tag=<label>)".to_string(),
        ));
    }
    if tag.chars().any(char::is_whitespace) {
        return Err(TaskwireError::InvalidTag(format!(
            "{tag:?} must not contain whitespace"
        )));
    }
    if tag.starts_with('-') {
        return Err(TaskwireError::InvalidTag(format!(
            "{tag:?} must not start with '-'"
        )));
    }
    if VERSION_LIKE.is_match(tag) {
        return Err(TaskwireError::InvalidTag(format!(
            "{tag:?} looks like a version; npm rejects dist-tags that parse as semver"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_labels_pass() {
        for tag in [
            "next",
            "latest",
            "beta",
            "preview-v2",
            "rc.1-hotfix",
            "canary",
            "2024-release",
            "1-hotfix",
            "3+canary",
            "v2-preview",
            "1.2-beta",
        ] {
            validate_tag(tag).unwrap_or_else(|e| panic!("{tag} rejected: {e}"));
        }
    }

    #[test]
    fn version_like_labels_are_rejected() {
        for tag in [
            "1",
            "1.2.3",
            "v1.0.0",
            "^2.0",
            "2.x",
            "1.0.0-beta.1",
            "=1.2.3+build.5",
            "~1.2.3-rc",
        ] {
            assert!(
                matches!(validate_tag(tag), Err(TaskwireError::InvalidTag(_))),
                "{tag} accepted"
            );
        }
    }

    #[test]
    fn empty_and_spaced_labels_are_rejected() {
        assert!(validate_tag("").is_err());
        assert!(validate_tag("my tag").is_err());
        assert!(validate_tag("--dry").is_err());
    }
}
