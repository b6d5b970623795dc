//! Obtaining a value from configuration, prior knowledge, or a human.

use super::{ConfigManager, WriteOptions};
use crate::error::{ConfigError, Result};
use crate::types::Scope;
use crate::ui::DialogArgs;
use crate::value::{TypedValue, ValueType};

/// Options for [`ConfigManager::obtain`].
#[derive(Debug, Clone, Default)]
pub struct ObtainOptions {
    /// Used when the key is not configured and nothing will be stored.
    pub default: Option<String>,
    /// Dialog to show when the value must be asked for.
    pub dialog_type: Option<String>,
    /// Type to coerce the value to.
    pub value_type: Option<ValueType>,
    /// Persist an asked-for value to `target` or the key's destination.
    pub store: bool,
    /// Layer to store into; wins over the key definition's destination.
    pub target: Option<Scope>,
    /// Dialog arguments; these win over the ones from the key definition.
    pub dialog_args: DialogArgs,
}

impl ObtainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn dialog(mut self, dialog_type: impl Into<String>) -> Self {
        self.dialog_type = Some(dialog_type.into());
        self
    }

    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn store(mut self) -> Self {
        self.store = true;
        self
    }

    pub fn to(mut self, target: Scope) -> Self {
        self.target = Some(target);
        self
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dialog_args.insert(name.into(), value.into());
        self
    }
}

fn coerce_raw(value_type: Option<ValueType>, raw: &str) -> Result<TypedValue> {
    match value_type {
        Some(value_type) => value_type.coerce_str(raw),
        None => Ok(TypedValue::Text(raw.to_string())),
    }
}

impl ConfigManager {
    /// Return the value of `key`, asking for it if necessary.
    ///
    /// The key definition registry fills in a type, a default, a dialog,
    /// and a storage destination where the call leaves them out. A configured
    /// value always wins. Otherwise the default is used unless the value is
    /// to be stored, in which case the prompter is asked. Without any dialog
    /// the default is returned and not stored. Coercion failures are
    /// reported, never papered over.
    pub fn obtain(&mut self, key: &str, opts: ObtainOptions) -> Result<TypedValue> {
        let definition = self.definitions.get(key).cloned().unwrap_or_default();
        let value_type = opts.value_type.or(definition.value_type);
        let default = opts.default.or(definition.default);

        if let Some(value) = self.get(key) {
            return match value_type {
                Some(value_type) => value_type.coerce(value),
                None => Ok(TypedValue::from(value.clone())),
            };
        }
        if !opts.store
            && let Some(default) = &default
        {
            return coerce_raw(value_type, default);
        }

        let Some(dialog_type) = opts
            .dialog_type
            .or_else(|| definition.ui.as_ref().map(|ui| ui.dialog_type.clone()))
        else {
            return match &default {
                Some(default) => coerce_raw(value_type, default),
                None => Err(ConfigError::Unresolvable(format!(
                    "value for '{}' is unknown and there is no way to ask for it",
                    key
                ))),
            };
        };

        let destination = if opts.store {
            Some(opts.target.or(definition.destination).ok_or_else(|| {
                ConfigError::InvalidArgument(format!(
                    "cannot store a value for '{}': no destination is known",
                    key
                ))
            })?)
        } else {
            None
        };

        let mut args = definition.ui.map(|ui| ui.args).unwrap_or_default();
        args.extend(opts.dialog_args);
        if let Some(default) = default {
            args.entry("default".to_string()).or_insert(default);
        }

        let raw = self.prompter.prompt(&dialog_type, &args)?;
        let value = coerce_raw(value_type, &raw)?;

        if let Some(destination) = destination {
            self.set(key, &raw, false, WriteOptions::to(destination))?;
        }
        Ok(value)
    }
}
