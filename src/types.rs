//! Scope and source selector types.
//!
//! A [`Scope`] names one precedence tier of configuration. A [`Source`]
//! selects which file-backed scopes a manager reads.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One precedence tier, listed from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Machine-wide git configuration.
    System,
    /// Per-user configuration in the home directory.
    Global,
    /// Repository configuration (`.git/config`).
    Local,
    /// Configuration committed with the dataset (`.datalad/config`).
    Dataset,
    /// Values injected by the running process.
    Override,
    /// Values derived from `DATALAD_*` environment variables.
    Environment,
}

impl Scope {
    /// Parse a scope from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "global" => Some(Self::Global),
            "local" => Some(Self::Local),
            "dataset" => Some(Self::Dataset),
            "override" => Some(Self::Override),
            "environment" => Some(Self::Environment),
            _ => None,
        }
    }

    /// Parse a scope that mutations may target.
    pub fn parse_target(s: &str) -> Result<Self> {
        let scope = Self::from_str(s).ok_or_else(|| {
            ConfigError::InvalidArgument(format!(
                "unknown configuration location '{}' (expected one of: local, global, dataset, override)",
                s
            ))
        })?;
        scope.ensure_writable()?;
        Ok(scope)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Global => "global",
            Self::Local => "local",
            Self::Dataset => "dataset",
            Self::Override => "override",
            Self::Environment => "environment",
        }
    }

    /// Whether mutations may target this scope.
    pub fn is_writable(&self) -> bool {
        matches!(
            self,
            Self::Global | Self::Local | Self::Dataset | Self::Override
        )
    }

    pub(crate) fn ensure_writable(&self) -> Result<()> {
        if self.is_writable() {
            Ok(())
        } else {
            Err(ConfigError::InvalidArgument(format!(
                "'{}' configuration cannot be written",
                self
            )))
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which file-backed scopes a manager reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    /// Only the dataset's committed configuration.
    Dataset,
    /// System, global, and the repository's `.git/config`.
    Local,
    /// The repository's `.git/config` and the dataset configuration.
    DatasetLocal,
    /// Everything (default).
    #[default]
    Any,
}

impl Source {
    /// Parse a source selector from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "dataset" => Some(Self::Dataset),
            "local" => Some(Self::Local),
            "dataset-local" => Some(Self::DatasetLocal),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Parse a selector, rejecting typos instead of falling back to a default.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| {
            ConfigError::InvalidArgument(format!(
                "unknown configuration source '{}' (expected one of: dataset, local, dataset-local, any)",
                s
            ))
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Local => "local",
            Self::DatasetLocal => "dataset-local",
            Self::Any => "any",
        }
    }

    /// Selectors that only make sense with a dataset.
    pub fn requires_dataset(&self) -> bool {
        matches!(self, Self::Dataset | Self::DatasetLocal)
    }

    /// Whether system and global files are read.
    pub fn reads_user_files(&self) -> bool {
        matches!(self, Self::Local | Self::Any)
    }

    /// Whether the repository's `.git/config` is read.
    pub fn reads_local(&self) -> bool {
        !matches!(self, Self::Dataset)
    }

    /// Whether the dataset's committed configuration is read.
    pub fn reads_dataset(&self) -> bool {
        !matches!(self, Self::Local)
    }

    /// Dataset-only managers ignore the process environment.
    pub fn reads_environment(&self) -> bool {
        !matches!(self, Self::Dataset)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_str() {
        assert_eq!(Scope::from_str("global"), Some(Scope::Global));
        assert_eq!(Scope::from_str("override"), Some(Scope::Override));
        assert_eq!(Scope::from_str("umpalumpa"), None);
    }

    #[test]
    fn test_scope_order_matches_precedence() {
        let mut scopes = vec![
            Scope::Environment,
            Scope::Dataset,
            Scope::System,
            Scope::Override,
            Scope::Local,
            Scope::Global,
        ];
        scopes.sort();
        assert_eq!(
            scopes,
            vec![
                Scope::System,
                Scope::Global,
                Scope::Local,
                Scope::Dataset,
                Scope::Override,
                Scope::Environment,
            ]
        );
    }

    #[test]
    fn test_parse_target_rejects_unknown_and_read_only() {
        assert_eq!(Scope::parse_target("dataset").unwrap(), Scope::Dataset);
        assert!(matches!(
            Scope::parse_target("umpalumpa"),
            Err(ConfigError::InvalidArgument(_))
        ));
        assert!(matches!(
            Scope::parse_target("environment"),
            Err(ConfigError::InvalidArgument(_))
        ));
        assert!(matches!(
            Scope::parse_target("system"),
            Err(ConfigError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(Source::parse("dataset-local").unwrap(), Source::DatasetLocal);
        assert_eq!(Source::default(), Source::Any);
        let err = Source::parse("locale").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));
        assert!(err.to_string().contains("locale"));
    }

    #[test]
    fn test_source_file_selection() {
        assert!(!Source::Dataset.reads_local());
        assert!(Source::Dataset.reads_dataset());
        assert!(!Source::Dataset.reads_user_files());
        assert!(!Source::Local.reads_dataset());
        assert!(Source::Local.reads_user_files());
        assert!(!Source::DatasetLocal.reads_user_files());
        assert!(Source::DatasetLocal.reads_local());
        assert!(Source::Any.reads_user_files() && Source::Any.reads_dataset());
    }

    #[test]
    fn test_scope_deserializes_lowercase() {
        let scope: Scope = serde_yaml::from_str("dataset").unwrap();
        assert_eq!(scope, Scope::Dataset);
    }
}
