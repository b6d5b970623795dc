//! dsconfig: layered git-style configuration for datasets.
//!
//! A [`ConfigManager`] merges system, global, repository-local, and dataset
//! configuration files with process overrides and `DATALAD_*` environment
//! variables into one queryable view, and writes changes back to exactly
//! one layer at a time.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod dataset;
pub mod definitions;
pub mod env;
pub mod error;
pub mod exit_codes;
pub mod git;
pub mod key;
pub mod store;
pub mod types;
pub mod ui;
pub mod url;
pub mod value;

#[cfg(test)]
mod test_support;

pub use dataset::{Dataset, RepositoryContext};
pub use definitions::{DialogSpec, KeyDefinition, KeyDefinitions};
pub use error::{ConfigError, Result};
pub use store::{ConfigManager, ConfigOptions, LayerInfo, ObtainOptions, WriteOptions};
pub use types::{Scope, Source};
pub use url::rewrite_url;
pub use value::{ConfigValue, TypedValue, ValueType};
