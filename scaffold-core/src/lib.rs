//! Scaffold core library: domain types, user configuration, errors.
//!
//! Public API surface:
//! - [`types`]: fingerprints, manifests, change reports
//! - [`error`]: [`ConfigError`]
//! - [`config`]: user config file and replay answers

pub mod config;
pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::{ChangeReport, FileClass, Fingerprint, Manifest, TemplateName};
