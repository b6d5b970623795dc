//! Environment variable layer.
//!
//! Variables named `DATALAD_<SECTION>_<KEY>` become keys
//! `datalad.<section>.<key>`: the name is lowercased and every single
//! underscore becomes a dot. A double underscore becomes a dash, so
//! `DATALAD_FOO__BAR_BAZ` maps to `datalad.foo-bar.baz`.

use crate::key;
use crate::value::ConfigValue;
use std::collections::BTreeMap;
use std::fmt;

/// Prefix selecting environment variables for the configuration layer.
pub const ENV_PREFIX: &str = "DATALAD_";

/// Trait for abstracting over environment variable sources.
///
/// This allows testing without modifying the actual environment.
pub trait EnvSource: fmt::Debug {
    /// All variables as name/value pairs.
    fn vars(&self) -> Vec<(String, String)>;
}

/// Environment source that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn vars(&self) -> Vec<(String, String)> {
        // non-unicode variables cannot name configuration keys anyway
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

/// Environment source backed by a map (for testing).
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: BTreeMap<String, String>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock environment from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MockEnv {
    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Map an environment variable name to a configuration key.
pub fn key_for_var(name: &str) -> Option<String> {
    let rest = name.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    let key = format!("datalad.{}", rest.to_lowercase())
        .split("__")
        .map(|part| part.replace('_', "."))
        .collect::<Vec<_>>()
        .join("-");
    key::validate(&key).ok()?;
    Some(key)
}

/// Build the environment layer from a source.
pub fn environment_layer(env: &dyn EnvSource) -> BTreeMap<String, ConfigValue> {
    env.vars()
        .into_iter()
        .filter_map(|(name, value)| Some((key_for_var(&name)?, ConfigValue::Scalar(value))))
        .collect()
}
