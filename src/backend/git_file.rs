//! Configuration file backend driven by `git config --file`.

use super::{Entry, KeyValueBackend};
use crate::error::{ConfigError, Result};
use crate::git::run_git;
use crate::key;
use std::path::{Path, PathBuf};

/// A single git-format configuration file.
///
/// The file does not need to exist: listing a missing file yields nothing,
/// and the first write creates it (its directory must exist).
#[derive(Debug, Clone)]
pub struct GitConfigFile {
    path: PathBuf,
}

impl GitConfigFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        // git runs from another directory, so a relative path must not reach it
        let path = std::path::absolute(&self.path)?;
        let file = path.to_string_lossy();
        let mut full = vec!["config", "--file", file.as_ref()];
        full.extend_from_slice(args);
        // git never looks outside --file here, so any existing directory works
        let cwd = path
            .parent()
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| Path::new("."));
        run_git(cwd, &full).map(|output| output.raw_stdout)
    }
}

/// Parse `git config --list -z` output.
///
/// Each entry is `key\nvalue\0`, or `key\0` for a key without a value.
pub fn parse_listing(raw: &str) -> Vec<Entry> {
    raw.split('\0')
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| match chunk.split_once('\n') {
            Some((key, value)) => (key.to_string(), Some(value.to_string())),
            None => (chunk.to_string(), None),
        })
        .collect()
}

impl KeyValueBackend for GitConfigFile {
    fn get_all(&self, key: &str) -> Result<Vec<Option<String>>> {
        let wanted = key::normalize(key);
        let values: Vec<Option<String>> = self
            .list()?
            .into_iter()
            .filter(|(k, _)| *k == wanted)
            .map(|(_, v)| v)
            .collect();
        if values.is_empty() {
            return Err(ConfigError::CommandFailed(format!(
                "key '{}' not found in {}",
                key,
                self.path.display()
            )));
        }
        Ok(values)
    }

    fn add(&mut self, key: &str, value: &str) -> Result<()> {
        self.run(&["--add", key, value]).map(drop)
    }

    fn set(&mut self, key: &str, value: &str, replace_all: bool) -> Result<()> {
        if replace_all {
            self.run(&["--replace-all", key, value]).map(drop)
        } else {
            self.run(&[key, value]).map(drop)
        }
    }

    fn unset(&mut self, key: &str) -> Result<()> {
        self.run(&["--unset-all", key]).map(drop)
    }

    fn rename_section(&mut self, old: &str, new: &str) -> Result<()> {
        self.run(&["--rename-section", old, new]).map(drop)
    }

    fn remove_section(&mut self, name: &str) -> Result<()> {
        self.run(&["--remove-section", name]).map(drop)
    }

    fn list(&self) -> Result<Vec<Entry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        self.run(&["--list", "-z"]).map(|raw| parse_listing(&raw))
    }
}
