//! Prior knowledge about configuration keys.
//!
//! A [`KeyDefinitions`] registry tells `obtain` what type a key has, which
//! default applies, how to ask for it, and where to store the answer. It is
//! owned by the manager rather than shared globally, and can be loaded from
//! YAML:
//!
//! ```yaml
//! datalad.test.dummy:
//!   type: float
//!   default: "5.3"
//!   ui:
//!     type: question
//!     args:
//!       text: tell me
//!   destination: dataset
//! ```

use crate::error::{ConfigError, Result};
use crate::key;
use crate::types::Scope;
use crate::ui::DialogArgs;
use crate::value::ValueType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// How to ask for a key interactively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSpec {
    /// Dialog type passed to the prompter (`question`, `yesno`).
    #[serde(rename = "type")]
    pub dialog_type: String,

    /// Default dialog arguments; call arguments take precedence.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: DialogArgs,
}

impl DialogSpec {
    pub fn new(dialog_type: impl Into<String>) -> Self {
        Self {
            dialog_type: dialog_type.into(),
            args: DialogArgs::new(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }
}

/// Everything known in advance about one key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyDefinition {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<DialogSpec>,

    /// Scope `obtain(store = true)` writes to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Scope>,
}

impl KeyDefinition {
    pub fn typed(value_type: ValueType) -> Self {
        Self {
            value_type: Some(value_type),
            ..Self::default()
        }
    }
}

/// Registry of key definitions, keyed by normalized key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyDefinitions {
    entries: BTreeMap<String, KeyDefinition>,
}

impl KeyDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse definitions from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let parsed: KeyDefinitions = serde_yaml::from_str(yaml)?;
        Ok(Self {
            entries: parsed
                .entries
                .into_iter()
                .map(|(k, v)| (key::normalize(&k), v))
                .collect(),
        })
    }

    /// Load definitions from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidArgument(format!(
                "failed to read key definitions '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn get(&self, key: &str) -> Option<&KeyDefinition> {
        self.entries.get(&key::normalize(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut KeyDefinition> {
        self.entries.get_mut(&key::normalize(key))
    }

    pub fn insert(&mut self, key: &str, definition: KeyDefinition) -> Option<KeyDefinition> {
        self.entries.insert(key::normalize(key), definition)
    }

    pub fn remove(&mut self, key: &str) -> Option<KeyDefinition> {
        self.entries.remove(&key::normalize(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
