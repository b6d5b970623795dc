//! Configuration values and type coercion.
//!
//! A key in a single layer is either a flag (present without a value), a
//! single string, or several strings when the key is repeated. Typed access
//! goes through [`ValueType`], which never guesses: a value that does not
//! parse as the requested type is an error.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of one key in the merged view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Key present with no value; reads as boolean true.
    Flag,
    /// Key defined once.
    Scalar(String),
    /// Key defined several times, in file order.
    Multi(Vec<String>),
}

impl ConfigValue {
    /// Build a value from backend entries (`None` marks a flag occurrence).
    ///
    /// Flags inside a repeated key read as empty strings, which is what
    /// `git config --get-all` reports for them.
    pub fn from_entries<I>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut value: Option<ConfigValue> = None;
        for entry in entries {
            value = Some(match value {
                None => entry.map_or(ConfigValue::Flag, ConfigValue::Scalar),
                Some(existing) => existing.appended(entry),
            });
        }
        value
    }

    /// Return this value with one more occurrence appended.
    pub fn appended(self, entry: Option<String>) -> Self {
        let entry = entry.unwrap_or_default();
        let mut values = match self {
            ConfigValue::Flag => vec![String::new()],
            ConfigValue::Scalar(s) => vec![s],
            ConfigValue::Multi(values) => values,
        };
        values.push(entry);
        ConfigValue::Multi(values)
    }

    /// Backend entries for this value, the inverse of [`ConfigValue::from_entries`].
    pub fn entries(&self) -> Vec<Option<String>> {
        match self {
            ConfigValue::Flag => vec![None],
            ConfigValue::Scalar(s) => vec![Some(s.clone())],
            ConfigValue::Multi(values) => values.iter().cloned().map(Some).collect(),
        }
    }

    /// All string values (empty for a flag).
    pub fn values(&self) -> Vec<&str> {
        match self {
            ConfigValue::Flag => Vec::new(),
            ConfigValue::Scalar(s) => vec![s.as_str()],
            ConfigValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// The single string value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ConfigValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Number of occurrences.
    pub fn count(&self) -> usize {
        match self {
            ConfigValue::Flag | ConfigValue::Scalar(_) => 1,
            ConfigValue::Multi(values) => values.len(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, ConfigValue::Multi(_))
    }

    /// Parse the single value as an integer.
    pub fn as_int(&self) -> Result<i64> {
        let raw = self.single("an integer")?;
        parse_int(raw)
    }

    /// Parse the single value as a float.
    pub fn as_float(&self) -> Result<f64> {
        let raw = self.single("a float")?;
        parse_float(raw)
    }

    /// Interpret the value as a boolean.
    ///
    /// A flag is true and an empty string is false. Repeated keys are a type
    /// mismatch rather than a parse failure.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            ConfigValue::Flag => Ok(true),
            ConfigValue::Scalar(s) => parse_bool(s),
            ConfigValue::Multi(values) => Err(ConfigError::TypeMismatch(format!(
                "cannot interpret {} values as a boolean",
                values.len()
            ))),
        }
    }

    fn single(&self, what: &str) -> Result<&str> {
        match self {
            ConfigValue::Scalar(s) => Ok(s),
            ConfigValue::Flag => Err(ConfigError::InvalidValue(format!(
                "key without a value is not {}",
                what
            ))),
            ConfigValue::Multi(values) => Err(ConfigError::InvalidValue(format!(
                "{} values cannot be read as {}",
                values.len(),
                what
            ))),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Flag => Ok(()),
            ConfigValue::Scalar(s) => write!(f, "{}", s),
            ConfigValue::Multi(values) => write!(f, "{}", values.join("\n")),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Scalar(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Scalar(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(values: Vec<String>) -> Self {
        match values.len() {
            1 => ConfigValue::Scalar(values.into_iter().next().unwrap_or_default()),
            _ => ConfigValue::Multi(values),
        }
    }
}

/// Requested type for `obtain` and typed key definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[serde(alias = "str")]
    String,
    Int,
    Float,
    Bool,
}

impl ValueType {
    /// Parse a value type from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "str" | "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Coerce a stored value.
    pub fn coerce(self, value: &ConfigValue) -> Result<TypedValue> {
        match self {
            ValueType::String => Ok(TypedValue::from(value.clone())),
            ValueType::Int => value.as_int().map(TypedValue::Int),
            ValueType::Float => value.as_float().map(TypedValue::Float),
            ValueType::Bool => value.as_bool().map(TypedValue::Bool),
        }
    }

    /// Coerce a raw string such as a default or a prompt response.
    pub fn coerce_str(self, raw: &str) -> Result<TypedValue> {
        match self {
            ValueType::String => Ok(TypedValue::Text(raw.to_string())),
            ValueType::Int => parse_int(raw).map(TypedValue::Int),
            ValueType::Float => parse_float(raw).map(TypedValue::Float),
            ValueType::Bool => parse_bool(raw).map(TypedValue::Bool),
        }
    }
}

/// Value returned by `obtain`, typed when a type was requested or known.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Flag,
    Text(String),
    Multi(Vec<String>),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<ConfigValue> for TypedValue {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Flag => TypedValue::Flag,
            ConfigValue::Scalar(s) => TypedValue::Text(s),
            ConfigValue::Multi(values) => TypedValue::Multi(values),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Flag => Ok(()),
            TypedValue::Text(s) => write!(f, "{}", s),
            TypedValue::Multi(values) => write!(f, "{}", values.join("\n")),
            TypedValue::Int(i) => write!(f, "{}", i),
            TypedValue::Float(x) => write!(f, "{}", x),
            TypedValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

fn parse_int(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidValue(format!("'{}' is not a valid integer", raw)))
}

fn parse_float(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidValue(format!("'{}' is not a valid float", raw)))
}

/// Lenient boolean parsing: yes/no, true/false, on/off, and integers.
pub fn parse_bool(raw: &str) -> Result<bool> {
    let lowered = raw.trim().to_lowercase();
    match lowered.as_str() {
        "" | "no" | "false" | "off" => Ok(false),
        "yes" | "true" | "on" => Ok(true),
        other => other
            .parse::<i64>()
            .map(|n| n != 0)
            .map_err(|_| ConfigError::InvalidValue(format!("'{}' is not a valid boolean", raw))),
    }
}
