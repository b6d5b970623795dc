//! Writes to a single configuration layer.
//!
//! Every mutation targets exactly one scope. File scopes go through
//! `git config --file`; the override scope is an in-memory layer with the
//! same rules. A failed mutation never triggers a reload, so the merged view
//! stays as it was.

use super::ConfigManager;
use crate::backend::{GitConfigFile, KeyValueBackend};
use crate::dataset::{dataset_config_path, local_config_path};
use crate::error::{ConfigError, Result};
use crate::types::Scope;
use std::path::PathBuf;
use tracing::debug;

/// Where a mutation goes and whether the view is refreshed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Target scope; `None` picks `dataset` for a dataset-bound manager and
    /// `global` otherwise.
    pub target: Option<Scope>,
    /// Rebuild the merged view after writing. Turn off to batch writes.
    pub reload: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            target: None,
            reload: true,
        }
    }
}

impl WriteOptions {
    pub fn to(scope: Scope) -> Self {
        Self {
            target: Some(scope),
            ..Self::default()
        }
    }

    pub fn without_reload(mut self) -> Self {
        self.reload = false;
        self
    }
}

impl From<Scope> for WriteOptions {
    fn from(scope: Scope) -> Self {
        Self::to(scope)
    }
}

impl From<Option<Scope>> for WriteOptions {
    fn from(target: Option<Scope>) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }
}

impl ConfigManager {
    /// Append a value to `key`, keeping existing ones.
    pub fn add(&mut self, key: &str, value: &str, opts: impl Into<WriteOptions>) -> Result<()> {
        self.write(opts.into(), "add", |backend| backend.add(key, value))
    }

    /// Set `key` to a single value.
    ///
    /// With several existing values this fails unless `force` is given, in
    /// which case all of them are replaced.
    pub fn set(
        &mut self,
        key: &str,
        value: &str,
        force: bool,
        opts: impl Into<WriteOptions>,
    ) -> Result<()> {
        self.write(opts.into(), "set", |backend| backend.set(key, value, force))
    }

    /// Remove every value of `key`.
    pub fn unset(&mut self, key: &str, opts: impl Into<WriteOptions>) -> Result<()> {
        self.write(opts.into(), "unset", |backend| backend.unset(key))
    }

    pub fn rename_section(
        &mut self,
        old: &str,
        new: &str,
        opts: impl Into<WriteOptions>,
    ) -> Result<()> {
        self.write(opts.into(), "rename-section", |backend| {
            backend.rename_section(old, new)
        })
    }

    /// Remove all keys of a section.
    ///
    /// Whether an emptied section header stays behind in the file depends
    /// on the git version.
    pub fn remove_section(&mut self, name: &str, opts: impl Into<WriteOptions>) -> Result<()> {
        self.write(opts.into(), "remove-section", |backend| {
            backend.remove_section(name)
        })
    }

    /// Scope written to when the caller names none.
    pub fn default_target(&self) -> Scope {
        if self.dataset.is_some() {
            Scope::Dataset
        } else {
            Scope::Global
        }
    }

    fn write<F>(&mut self, opts: WriteOptions, op: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut dyn KeyValueBackend) -> Result<()>,
    {
        let target = opts.target.unwrap_or_else(|| self.default_target());
        target.ensure_writable()?;

        if target == Scope::Override {
            debug!(scope = %target, "config {}", op);
            apply(&mut self.overrides)?;
            if opts.reload {
                self.reload(false)?;
            }
            return Ok(());
        }

        let path = self.target_file(target)?;
        debug!(scope = %target, path = %path.display(), "config {}", op);
        let mut file = GitConfigFile::new(&path);
        apply(&mut file)?;
        if opts.reload {
            self.reload(true)?;
        }
        Ok(())
    }

    /// File backing a writable file scope, prepared for writing.
    fn target_file(&self, scope: Scope) -> Result<PathBuf> {
        match scope {
            Scope::Global => Ok(self.global_path.clone()),
            Scope::Local => {
                let root = self
                    .dataset
                    .as_deref()
                    .filter(|ds| ds.has_repository())
                    .and_then(|ds| ds.resolve_root())
                    .ok_or_else(|| {
                        ConfigError::CommandFailed(
                            "cannot write local configuration outside of a repository"
                                .to_string(),
                        )
                    })?;
                Ok(local_config_path(&root))
            }
            Scope::Dataset => {
                let root = self
                    .dataset
                    .as_deref()
                    .and_then(|ds| ds.resolve_root())
                    .ok_or_else(|| {
                        ConfigError::InvalidArgument(
                            "cannot write dataset configuration without a dataset".to_string(),
                        )
                    })?;
                let path = dataset_config_path(&root);
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                Ok(path)
            }
            other => Err(ConfigError::InvalidArgument(format!(
                "'{}' configuration cannot be written",
                other
            ))),
        }
    }
}
