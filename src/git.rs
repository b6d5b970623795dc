//! Git command runner for dsconfig.
//!
//! Provides a wrapper around git commands with captured stdout/stderr
//! and structured error handling. The configuration file backend and
//! repository discovery both go through this module.

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard output exactly as emitted, needed for NUL-delimited listings
    /// whose last value may end in whitespace.
    pub raw_stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        let raw_stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Self {
            stdout: raw_stdout.trim().to_string(),
            raw_stdout,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Run a git command with the specified working directory.
///
/// # Arguments
///
/// * `cwd` - The working directory to run the command in
/// * `args` - The git command arguments (without "git" prefix)
///
/// # Returns
///
/// * `Ok(GitOutput)` - On successful execution (exit code 0)
/// * `Err(ConfigError::CommandFailed)` - On spawn failure or non-zero exit code
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();
    debug!(cwd = %cwd.display(), "git {}", args.join(" "));

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| {
            ConfigError::CommandFailed(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout.clone()
        } else {
            git_output.stderr.clone()
        };

        Err(ConfigError::CommandFailed(format!(
            "git {} failed (exit code {}): {}",
            args.join(" "),
            exit_code,
            error_msg
        )))
    }
}

/// Get the repository root directory using `git rev-parse --show-toplevel`.
///
/// Works from any location within a git repository.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The absolute path to the repository root
/// * `Err(ConfigError::InvalidArgument)` - If `cwd` is not inside a git repository
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();
    let output = run_git(cwd, &["rev-parse", "--show-toplevel"]).map_err(|e| {
        ConfigError::InvalidArgument(format!(
            "'{}' is not inside a git repository ({})",
            cwd.display(),
            e
        ))
    })?;
    Ok(PathBuf::from(&output.stdout))
}
