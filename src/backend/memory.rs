//! In-memory backend used for the override layer.

use super::{Entry, KeyValueBackend};
use crate::error::{ConfigError, Result};
use crate::key;
use crate::value::ConfigValue;
use std::collections::BTreeMap;

/// An in-memory layer with the same rules as a configuration file.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: BTreeMap<String, ConfigValue>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key without going through validation of the value shape.
    pub fn insert(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key::normalize(key), value);
    }

    /// Current contents, keyed by normalized key.
    pub fn values(&self) -> &BTreeMap<String, ConfigValue> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn section_keys(&self, section: &str) -> Vec<String> {
        let wanted = key::normalize_section(section);
        self.values
            .keys()
            .filter(|k| key::section_of(k) == Some(wanted.as_str()))
            .cloned()
            .collect()
    }

    fn missing_section(section: &str) -> ConfigError {
        ConfigError::CommandFailed(format!("no such section: {}", section))
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_all(&self, key: &str) -> Result<Vec<Option<String>>> {
        self.values
            .get(&key::normalize(key))
            .map(ConfigValue::entries)
            .ok_or_else(|| ConfigError::CommandFailed(format!("key '{}' not found", key)))
    }

    fn add(&mut self, key: &str, value: &str) -> Result<()> {
        key::validate(key)?;
        let key = key::normalize(key);
        let updated = match self.values.remove(&key) {
            Some(existing) => existing.appended(Some(value.to_string())),
            None => ConfigValue::from(value),
        };
        self.values.insert(key, updated);
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str, replace_all: bool) -> Result<()> {
        key::validate(key)?;
        let key = key::normalize(key);
        if let Some(existing) = self.values.get(&key)
            && existing.count() > 1
            && !replace_all
        {
            return Err(ConfigError::CommandFailed(format!(
                "cannot overwrite multiple values of '{}' with a single value",
                key
            )));
        }
        self.values.insert(key, ConfigValue::from(value));
        Ok(())
    }

    fn unset(&mut self, key: &str) -> Result<()> {
        self.values
            .remove(&key::normalize(key))
            .map(drop)
            .ok_or_else(|| ConfigError::CommandFailed(format!("key '{}' not found", key)))
    }

    fn rename_section(&mut self, old: &str, new: &str) -> Result<()> {
        let keys = self.section_keys(old);
        if keys.is_empty() {
            return Err(Self::missing_section(old));
        }
        let new = key::normalize_section(new);
        for old_key in keys {
            if let Some(value) = self.values.remove(&old_key) {
                let name = key::split(&old_key).map_or(old_key.as_str(), |(_, name)| name);
                self.values.insert(format!("{}.{}", new, name), value);
            }
        }
        Ok(())
    }

    fn remove_section(&mut self, name: &str) -> Result<()> {
        let keys = self.section_keys(name);
        if keys.is_empty() {
            return Err(Self::missing_section(name));
        }
        for k in keys {
            self.values.remove(&k);
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<Entry>> {
        Ok(self
            .values
            .iter()
            .flat_map(|(k, v)| v.entries().into_iter().map(move |e| (k.clone(), e)))
            .collect())
    }
}
