// src/publish/mod.rs

//! npm publishing.
//!
//! - [`package`] publishes one package directory (`:publish`).
//! - [`flow`] tracks the `publish` task's progress through auth check, build
//!   and publish.
//! - [`tag`] validates `--tag` labels.

pub mod flow;
pub mod package;
pub mod tag;

pub use flow::{PublishFlow, PublishState};
pub use package::{PublishRequest, publish_args, publish_package};
pub use tag::validate_tag;
