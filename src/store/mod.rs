//! The layered configuration manager.
//!
//! A [`ConfigManager`] reads the files selected by its [`Source`], stacks
//! them from lowest to highest precedence, and puts the override and
//! environment layers on top:
//!
//! ```text
//! system < global < local < dataset < override < environment
//! ```
//!
//! A later layer replaces an earlier layer's values for the same key
//! entirely; repeated keys inside one file stay together as a multi-value.

mod mutations;
mod obtain;
mod sources;


pub use mutations::WriteOptions;
pub use obtain::ObtainOptions;
pub use sources::{default_global_path, default_system_path};

use crate::backend::{Entry, GitConfigFile, KeyValueBackend, MemoryBackend};
use crate::dataset::RepositoryContext;
use crate::definitions::KeyDefinitions;
use crate::env::{self, EnvSource, StdEnv};
use crate::error::{ConfigError, Result};
use crate::key;
use crate::types::{Scope, Source};
use crate::ui::{NoPrompter, Prompter};
use crate::url;
use crate::value::ConfigValue;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Settings for building a [`ConfigManager`].
#[derive(Debug)]
pub struct ConfigOptions {
    dataset: Option<Box<dyn RepositoryContext>>,
    source: Source,
    overrides: BTreeMap<String, ConfigValue>,
    system_path: Option<PathBuf>,
    global_path: Option<PathBuf>,
    env: Box<dyn EnvSource>,
    definitions: KeyDefinitions,
    prompter: Box<dyn Prompter>,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            dataset: None,
            source: Source::Any,
            overrides: BTreeMap::new(),
            system_path: None,
            global_path: None,
            env: Box::new(StdEnv),
            definitions: KeyDefinitions::new(),
            prompter: Box::new(NoPrompter),
        }
    }
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the manager to a dataset.
    pub fn dataset<D: RepositoryContext + 'static>(mut self, dataset: D) -> Self {
        self.dataset = Some(Box::new(dataset));
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Seed the override layer with one key.
    pub fn with_override(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
        self.overrides.insert(key.to_string(), value.into());
        self
    }

    /// Seed the override layer.
    pub fn overrides(mut self, overrides: BTreeMap<String, ConfigValue>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    /// Use `path` instead of the machine-wide git configuration.
    pub fn system_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.system_path = Some(path.into());
        self
    }

    /// Use `path` instead of the per-user git configuration.
    pub fn global_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.global_path = Some(path.into());
        self
    }

    /// Read `DATALAD_*` variables from `env` instead of the process.
    pub fn env<E: EnvSource + 'static>(mut self, env: E) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn definitions(mut self, definitions: KeyDefinitions) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn prompter<P: Prompter + 'static>(mut self, prompter: P) -> Self {
        self.prompter = Box::new(prompter);
        self
    }
}

/// Modification stamp used to skip re-reading unchanged files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        if !meta.is_file() {
            return None;
        }
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// One configuration file as last read.
#[derive(Debug, Clone)]
struct FileLayer {
    scope: Scope,
    path: PathBuf,
    stamp: Option<FileStamp>,
    values: BTreeMap<String, ConfigValue>,
}

/// Provenance of one layer, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerInfo {
    pub scope: Scope,
    /// Backing file; `None` for the override and environment layers.
    pub path: Option<PathBuf>,
    /// Whether the file existed at the last reload.
    pub present: bool,
    /// Number of keys the layer contributes.
    pub keys: usize,
}

/// Group listing entries by key, keeping file order within each key.
fn collect_entries(entries: Vec<Entry>) -> BTreeMap<String, ConfigValue> {
    let mut grouped: BTreeMap<String, Vec<Option<String>>> = BTreeMap::new();
    for (k, entry) in entries {
        grouped.entry(k).or_default().push(entry);
    }
    grouped
        .into_iter()
        .filter_map(|(k, entries)| ConfigValue::from_entries(entries).map(|value| (k, value)))
        .collect()
}

fn read_file(path: &Path) -> Option<BTreeMap<String, ConfigValue>> {
    match GitConfigFile::new(path).list() {
        Ok(entries) => Some(collect_entries(entries)),
        Err(e) => {
            debug!(path = %path.display(), "skipping unreadable config file: {}", e);
            None
        }
    }
}

/// Merged, queryable view over all configuration layers.
#[derive(Debug)]
pub struct ConfigManager {
    dataset: Option<Box<dyn RepositoryContext>>,
    source: Source,
    system_path: PathBuf,
    global_path: PathBuf,
    env: Box<dyn EnvSource>,
    overrides: MemoryBackend,
    definitions: KeyDefinitions,
    prompter: Box<dyn Prompter>,
    files: Vec<FileLayer>,
    environment: BTreeMap<String, ConfigValue>,
    merged: BTreeMap<String, ConfigValue>,
}

impl ConfigManager {
    /// Build a manager and read its configuration.
    ///
    /// Fails with [`ConfigError::InvalidArgument`] when the source needs a
    /// dataset and none resolves.
    pub fn new(options: ConfigOptions) -> Result<Self> {
        let mut overrides = MemoryBackend::new();
        for (k, v) in options.overrides {
            overrides.insert(&k, v);
        }
        let mut manager = Self {
            dataset: options.dataset,
            source: options.source,
            system_path: options.system_path.unwrap_or_else(default_system_path),
            global_path: options.global_path.unwrap_or_else(default_global_path),
            env: options.env,
            overrides,
            definitions: options.definitions,
            prompter: options.prompter,
            files: Vec::new(),
            environment: BTreeMap::new(),
            merged: BTreeMap::new(),
        };
        manager.reload(true)?;
        Ok(manager)
    }

    /// System, global, and environment configuration only.
    pub fn global() -> Result<Self> {
        Self::new(ConfigOptions::new())
    }

    /// Everything visible from `dataset`.
    pub fn for_dataset<D: RepositoryContext + 'static>(dataset: D) -> Result<Self> {
        Self::new(ConfigOptions::new().dataset(dataset))
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn dataset(&self) -> Option<&dyn RepositoryContext> {
        self.dataset.as_deref()
    }

    /// Re-read configuration files and rebuild the merged view.
    ///
    /// Without `force`, files whose modification time and size are
    /// unchanged since the last read keep their cached contents. The
    /// environment is always read again.
    pub fn reload(&mut self, force: bool) -> Result<()> {
        let root = sources::resolve_root(self.source, self.dataset.as_deref())?;
        let wanted = sources::file_layers(
            self.source,
            root.as_deref(),
            &self.system_path,
            &self.global_path,
        );

        let mut previous = std::mem::take(&mut self.files);
        let mut files = Vec::with_capacity(wanted.len());
        for (scope, path) in wanted {
            let stamp = FileStamp::of(&path);
            let cached = previous
                .iter()
                .position(|layer| layer.path == path)
                .map(|i| previous.swap_remove(i));

            let values = match (stamp, cached) {
                (None, _) => {
                    debug!(path = %path.display(), "config file not present");
                    BTreeMap::new()
                }
                (Some(stamp), Some(layer)) if !force && layer.stamp == Some(stamp) => {
                    layer.values
                }
                (Some(_), _) => {
                    debug!(path = %path.display(), scope = %scope, "reading config file");
                    read_file(&path).unwrap_or_default()
                }
            };
            files.push(FileLayer {
                scope,
                path,
                stamp,
                values,
            });
        }
        self.files = files;

        self.environment = if self.source.reads_environment() {
            env::environment_layer(self.env.as_ref())
        } else {
            BTreeMap::new()
        };

        let mut merged = BTreeMap::new();
        for layer in &self.files {
            merged.extend(layer.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged.extend(
            self.overrides
                .values()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged.extend(
            self.environment
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self.merged = merged;
        Ok(())
    }

    /// Number of keys in the merged view.
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.merged.contains_key(&key::normalize(key))
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.merged.keys().map(String::as_str)
    }

    /// Key/value pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.merged.iter()
    }

    /// The merged view.
    pub fn as_map(&self) -> &BTreeMap<String, ConfigValue> {
        &self.merged
    }

    /// All values of `key`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.merged.get(&key::normalize(key))
    }

    pub fn get_or(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
        self.get(key).cloned().unwrap_or_else(|| default.into())
    }

    /// All values of `key`, failing with [`ConfigError::KeyNotFound`].
    pub fn value(&self, key: &str) -> Result<&ConfigValue> {
        self.get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    /// Value of `section.option`; a `None` default means "no default".
    pub fn get_value(
        &self,
        section: &str,
        option: &str,
        default: Option<&str>,
    ) -> Result<ConfigValue> {
        let key = key::join(section, option);
        match (self.merged.get(&key), default) {
            (Some(value), _) => Ok(value.clone()),
            (None, Some(default)) => Ok(ConfigValue::from(default)),
            (None, None) => Err(ConfigError::KeyNotFound(key)),
        }
    }

    pub fn getint(&self, section: &str, option: &str) -> Result<i64> {
        self.value(&key::join(section, option))?.as_int()
    }

    pub fn getfloat(&self, section: &str, option: &str) -> Result<f64> {
        self.value(&key::join(section, option))?.as_float()
    }

    /// Boolean value of `section.option`.
    ///
    /// A key without a value is true and an empty value is false.
    pub fn getbool(&self, section: &str, option: &str, default: Option<bool>) -> Result<bool> {
        let key = key::join(section, option);
        match (self.merged.get(&key), default) {
            (Some(value), _) => value.as_bool(),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(ConfigError::KeyNotFound(key)),
        }
    }

    /// Whether any key lives in exactly this section.
    pub fn has_section(&self, section: &str) -> bool {
        let wanted = key::normalize_section(section);
        self.merged
            .keys()
            .any(|k| key::section_of(k) == Some(wanted.as_str()))
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.merged.contains_key(&key::join(section, option))
    }

    /// Distinct sections, sorted.
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = self
            .merged
            .keys()
            .filter_map(|k| key::section_of(k))
            .collect();
        sections.sort_unstable();
        sections.dedup();
        sections
    }

    /// Option names in exactly this section, sorted.
    pub fn options(&self, section: &str) -> Vec<&str> {
        let wanted = key::normalize_section(section);
        self.merged
            .keys()
            .filter_map(|k| key::split(k))
            .filter(|(s, _)| *s == wanted)
            .map(|(_, name)| name)
            .collect()
    }

    /// Key/value pairs, optionally restricted to keys under `section.`.
    pub fn items(&self, section: Option<&str>) -> Vec<(&str, &ConfigValue)> {
        let prefix = section.map(|s| format!("{}.", key::normalize_section(s)));
        self.merged
            .iter()
            .filter(|(k, _)| prefix.as_deref().is_none_or(|p| k.starts_with(p)))
            .map(|(k, v)| (k.as_str(), v))
            .collect()
    }

    /// Every layer that contributed at the last reload, lowest first.
    pub fn layers(&self) -> Vec<LayerInfo> {
        let mut layers: Vec<LayerInfo> = self
            .files
            .iter()
            .map(|layer| LayerInfo {
                scope: layer.scope,
                path: Some(layer.path.clone()),
                present: layer.stamp.is_some(),
                keys: layer.values.len(),
            })
            .collect();
        layers.push(LayerInfo {
            scope: Scope::Override,
            path: None,
            present: !self.overrides.is_empty(),
            keys: self.overrides.values().len(),
        });
        if self.source.reads_environment() {
            layers.push(LayerInfo {
                scope: Scope::Environment,
                path: None,
                present: !self.environment.is_empty(),
                keys: self.environment.len(),
            });
        }
        layers
    }

    /// Paths of the configuration files this manager reads.
    pub fn files(&self) -> Vec<&Path> {
        self.files.iter().map(|layer| layer.path.as_path()).collect()
    }

    /// Scope that supplies the current value of `key`.
    pub fn origin(&self, key: &str) -> Option<Scope> {
        let key = key::normalize(key);
        if self.environment.contains_key(&key) {
            return Some(Scope::Environment);
        }
        if self.overrides.values().contains_key(&key) {
            return Some(Scope::Override);
        }
        self.files
            .iter()
            .rev()
            .find(|layer| layer.values.contains_key(&key))
            .map(|layer| layer.scope)
    }

    /// Rewrite `url` with this manager's `url.<base>.insteadof` settings.
    pub fn rewrite_url(&self, url: &str) -> String {
        url::rewrite_url(&self.merged, url)
    }

    pub fn definitions(&self) -> &KeyDefinitions {
        &self.definitions
    }

    pub fn definitions_mut(&mut self) -> &mut KeyDefinitions {
        &mut self.definitions
    }

    pub fn set_prompter<P: Prompter + 'static>(&mut self, prompter: P) {
        self.prompter = Box::new(prompter);
    }
}
