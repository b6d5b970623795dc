//! Dataset context resolution.
//!
//! A configuration manager bound to a dataset reads `.git/config` and
//! `.datalad/config` under that dataset's root and nowhere else. The root is
//! resolved from the dataset itself, never from the process working
//! directory, so a manager cannot pick up configuration from whatever
//! repository the process happens to be running in.

use crate::error::Result;
use crate::git;
use std::fmt;
use std::path::{Path, PathBuf};

/// Directory holding the dataset's committed configuration.
pub const DATASET_CONFIG_DIR: &str = ".datalad";

/// File name of the dataset's committed configuration.
pub const DATASET_CONFIG_FILE: &str = "config";

/// Git directory name inside a repository.
pub const GIT_DIR: &str = ".git";

/// The repository collaborator seen by the configuration manager.
pub trait RepositoryContext: fmt::Debug {
    /// Root directory of the dataset, if it can be resolved.
    fn resolve_root(&self) -> Option<PathBuf>;

    /// Whether a repository (and therefore `.git/config`) exists at the root.
    fn has_repository(&self) -> bool;
}

/// A dataset rooted at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    path: PathBuf,
}

impl Dataset {
    /// Bind to `path` as the dataset root. The path does not need to exist yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Find the dataset enclosing `cwd` by asking git for the repository root.
    ///
    /// Only for explicit user requests (such as the CLI's `--dataset`);
    /// managers never do this on their own.
    pub fn discover<P: AsRef<Path>>(cwd: P) -> Result<Self> {
        git::get_repo_root(cwd).map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the repository configuration file.
    pub fn local_config_path(&self) -> PathBuf {
        local_config_path(&self.path)
    }

    /// Path of the committed dataset configuration file.
    pub fn dataset_config_path(&self) -> PathBuf {
        dataset_config_path(&self.path)
    }
}

impl RepositoryContext for Dataset {
    fn resolve_root(&self) -> Option<PathBuf> {
        if !self.path.is_dir() {
            return None;
        }
        Some(self.path.canonicalize().unwrap_or_else(|_| self.path.clone()))
    }

    fn has_repository(&self) -> bool {
        self.path.join(GIT_DIR).exists()
    }
}

/// Local configuration file under a resolved root.
pub(crate) fn local_config_path(root: &Path) -> PathBuf {
    root.join(GIT_DIR).join("config")
}

/// Dataset configuration file under a resolved root.
pub(crate) fn dataset_config_path(root: &Path) -> PathBuf {
    root.join(DATASET_CONFIG_DIR).join(DATASET_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_repo;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dataset_does_not_resolve() {
        let temp_dir = TempDir::new().unwrap();
        let ds = Dataset::new(temp_dir.path().join("nowhere"));
        assert_eq!(ds.resolve_root(), None);
        assert!(!ds.has_repository());
    }

    #[test]
    fn test_plain_directory_resolves_without_repository() {
        let temp_dir = TempDir::new().unwrap();
        let ds = Dataset::new(temp_dir.path());
        assert_eq!(
            ds.resolve_root(),
            Some(temp_dir.path().canonicalize().unwrap())
        );
        assert!(!ds.has_repository());
    }

    #[test]
    fn test_repository_detected() {
        let temp_dir = create_test_repo();
        let ds = Dataset::new(temp_dir.path());
        assert!(ds.has_repository());
        assert!(ds.local_config_path().exists());
        assert!(ds.dataset_config_path().ends_with(".datalad/config"));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let temp_dir = create_test_repo();
        let subdir = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&subdir).unwrap();

        let ds = Dataset::discover(&subdir).unwrap();
        assert_eq!(
            ds.path().canonicalize().unwrap(),
            temp_dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_discover_outside_repository_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Dataset::discover(temp_dir.path()).is_err());
    }
}
