// src/release/mod.rs

//! In-process steps of the release pipeline: removing the previous build
//! output and stripping test artifacts from the fresh one.

pub mod clean;
pub mod spec_files;

pub use clean::clean_dir;
pub use spec_files::strip_spec_files;
