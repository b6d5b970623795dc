//! Key-value backends for configuration layers.
//!
//! Every writable layer is reached through [`KeyValueBackend`]. File layers
//! shell out to `git config --file`; the override layer lives in memory but
//! follows the same rules, so a caller cannot tell the two apart except by
//! persistence.

mod git_file;
mod memory;

pub use git_file::GitConfigFile;
pub use memory::MemoryBackend;

use crate::error::Result;

/// One `(key, value)` occurrence; `None` is a key without a value.
pub type Entry = (String, Option<String>);

/// Operations a configuration layer supports.
///
/// Failures are reported as [`crate::error::ConfigError::CommandFailed`] and
/// are surfaced to callers unchanged.
pub trait KeyValueBackend {
    /// All values of `key` in order; fails if the key is absent.
    fn get_all(&self, key: &str) -> Result<Vec<Option<String>>>;

    /// Append a value, never touching existing ones.
    fn add(&mut self, key: &str, value: &str) -> Result<()>;

    /// Set a single value. With several existing values this fails unless
    /// `replace_all` is given.
    fn set(&mut self, key: &str, value: &str, replace_all: bool) -> Result<()>;

    /// Remove every value of `key`; fails if the key is absent.
    fn unset(&mut self, key: &str) -> Result<()>;

    /// Rename a section; fails if it does not exist.
    fn rename_section(&mut self, old: &str, new: &str) -> Result<()>;

    /// Remove a section and all of its keys; fails if it does not exist.
    fn remove_section(&mut self, name: &str) -> Result<()>;

    /// Every occurrence in the layer, in definition order.
    fn list(&self) -> Result<Vec<Entry>>;
}
