//! Error types for dsconfig.
//!
//! Uses thiserror for derive macros. Every variant maps to a CLI exit code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A selector, scope, dialog type, or destination was not acceptable.
    #[error("{0}")]
    InvalidArgument(String),

    /// A value could not be converted to the requested type.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A strict getter was asked for a key that is not set.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The value has the wrong shape for the requested access.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The value is not known and there is no way to ask for it.
    #[error("{0}")]
    Unresolvable(String),

    /// The configuration backend rejected a command.
    #[error("config command failed: {0}")]
    CommandFailed(String),

    /// Filesystem failure while preparing a write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key definitions could not be parsed.
    #[error("failed to parse key definitions: {0}")]
    Definitions(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::InvalidArgument(_) => exit_codes::USER_ERROR,
            ConfigError::InvalidValue(_) => exit_codes::USER_ERROR,
            ConfigError::TypeMismatch(_) => exit_codes::USER_ERROR,
            ConfigError::Definitions(_) => exit_codes::USER_ERROR,
            ConfigError::KeyNotFound(_) => exit_codes::KEY_NOT_FOUND,
            ConfigError::CommandFailed(_) => exit_codes::BACKEND_FAILURE,
            ConfigError::Io(_) => exit_codes::BACKEND_FAILURE,
            ConfigError::Unresolvable(_) => exit_codes::UNRESOLVABLE,
        }
    }
}

/// Result type alias for dsconfig operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_share_exit_code() {
        for err in [
            ConfigError::InvalidArgument("bad scope".to_string()),
            ConfigError::InvalidValue("not a float".to_string()),
            ConfigError::TypeMismatch("multi-valued".to_string()),
        ] {
            assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        }
    }

    #[test]
    fn key_not_found_has_correct_exit_code() {
        let err = ConfigError::KeyNotFound("a.b".to_string());
        assert_eq!(err.exit_code(), exit_codes::KEY_NOT_FOUND);
    }

    #[test]
    fn command_failed_has_correct_exit_code() {
        let err = ConfigError::CommandFailed("exit 5".to_string());
        assert_eq!(err.exit_code(), exit_codes::BACKEND_FAILURE);
    }

    #[test]
    fn unresolvable_has_correct_exit_code() {
        let err = ConfigError::Unresolvable("nothing known".to_string());
        assert_eq!(err.exit_code(), exit_codes::UNRESOLVABLE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = ConfigError::KeyNotFound("something.user".to_string());
        assert_eq!(err.to_string(), "key not found: something.user");

        let err = ConfigError::CommandFailed("git config --unset-all failed".to_string());
        assert_eq!(
            err.to_string(),
            "config command failed: git config --unset-all failed"
        );
    }
}
