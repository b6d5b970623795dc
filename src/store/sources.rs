//! Which configuration files a manager reads.

use crate::dataset::{RepositoryContext, dataset_config_path, local_config_path};
use crate::error::{ConfigError, Result};
use crate::types::{Scope, Source};
use std::path::{Path, PathBuf};

/// Machine-wide configuration file, honoring `GIT_CONFIG_SYSTEM`.
pub fn default_system_path() -> PathBuf {
    if let Some(path) = std::env::var_os("GIT_CONFIG_SYSTEM") {
        return PathBuf::from(path);
    }
    system_fallback()
}

#[cfg(not(windows))]
fn system_fallback() -> PathBuf {
    PathBuf::from("/etc/gitconfig")
}

#[cfg(windows)]
fn system_fallback() -> PathBuf {
    std::env::var_os("PROGRAMDATA")
        .map(|dir| PathBuf::from(dir).join("Git").join("config"))
        .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData\Git\config"))
}

/// Per-user configuration file, honoring `GIT_CONFIG_GLOBAL`.
pub fn default_global_path() -> PathBuf {
    if let Some(path) = std::env::var_os("GIT_CONFIG_GLOBAL") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gitconfig")
}

/// Resolve the dataset root, failing if the source cannot do without one.
pub(crate) fn resolve_root(
    source: Source,
    dataset: Option<&dyn RepositoryContext>,
) -> Result<Option<PathBuf>> {
    let root = dataset.and_then(|ds| ds.resolve_root());
    if root.is_none() && source.requires_dataset() {
        let reason = match dataset {
            Some(ds) => format!("dataset {:?} cannot be resolved", ds),
            None => "no dataset given".to_string(),
        };
        return Err(ConfigError::InvalidArgument(format!(
            "configuration source '{}' requires a dataset: {}",
            source, reason
        )));
    }
    Ok(root)
}

/// Files read for `source`, from lowest to highest precedence.
pub(crate) fn file_layers(
    source: Source,
    root: Option<&Path>,
    system: &Path,
    global: &Path,
) -> Vec<(Scope, PathBuf)> {
    let mut files = Vec::new();
    if source.reads_user_files() {
        files.push((Scope::System, system.to_path_buf()));
        files.push((Scope::Global, global.to_path_buf()));
    }
    if let Some(root) = root {
        if source.reads_local() {
            files.push((Scope::Local, local_config_path(root)));
        }
        if source.reads_dataset() {
            files.push((Scope::Dataset, dataset_config_path(root)));
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use tempfile::TempDir;

    fn scopes(files: &[(Scope, PathBuf)]) -> Vec<Scope> {
        files.iter().map(|(scope, _)| *scope).collect()
    }

    #[test]
    fn test_file_layers_per_source() {
        let root = Path::new("/ds");
        let sys = Path::new("/etc/gitconfig");
        let glob = Path::new("/home/u/.gitconfig");

        assert_eq!(
            scopes(&file_layers(Source::Any, Some(root), sys, glob)),
            vec![Scope::System, Scope::Global, Scope::Local, Scope::Dataset]
        );
        assert_eq!(
            scopes(&file_layers(Source::Local, Some(root), sys, glob)),
            vec![Scope::System, Scope::Global, Scope::Local]
        );
        assert_eq!(
            scopes(&file_layers(Source::DatasetLocal, Some(root), sys, glob)),
            vec![Scope::Local, Scope::Dataset]
        );
        assert_eq!(
            file_layers(Source::Dataset, Some(root), sys, glob),
            vec![(Scope::Dataset, PathBuf::from("/ds/.datalad/config"))]
        );
    }

    #[test]
    fn test_file_layers_without_dataset() {
        let sys = Path::new("/etc/gitconfig");
        let glob = Path::new("/home/u/.gitconfig");
        assert_eq!(
            scopes(&file_layers(Source::Any, None, sys, glob)),
            vec![Scope::System, Scope::Global]
        );
        assert_eq!(
            scopes(&file_layers(Source::Local, None, sys, glob)),
            vec![Scope::System, Scope::Global]
        );
    }

    #[test]
    fn test_resolve_root_requires_dataset() {
        assert!(matches!(
            resolve_root(Source::Dataset, None),
            Err(ConfigError::InvalidArgument(_))
        ));
        assert!(resolve_root(Source::Any, None).unwrap().is_none());

        let temp_dir = TempDir::new().unwrap();
        let missing = Dataset::new(temp_dir.path().join("nowhere"));
        assert!(matches!(
            resolve_root(Source::DatasetLocal, Some(&missing)),
            Err(ConfigError::InvalidArgument(_))
        ));
        assert!(resolve_root(Source::Local, Some(&missing)).unwrap().is_none());

        let present = Dataset::new(temp_dir.path());
        assert!(resolve_root(Source::Dataset, Some(&present)).unwrap().is_some());
    }
}
