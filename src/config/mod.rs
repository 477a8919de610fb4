// src/config/mod.rs

//! Configuration loading and validation for taskwire.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to defaults (`loader.rs`).
//! - Validate basic invariants like non-empty commands and a usable spec glob
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve_config};
pub use model::{
    CommandConfig, ConfigFile, LintSection, ProjectSection, PublishSection, ReleaseSection,
};
pub use validate::validate_config;
