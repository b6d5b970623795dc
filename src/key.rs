//! Configuration key helpers.
//!
//! Keys follow the git convention `section.name` or `section.subsection.name`.
//! The section and the name are case-insensitive and stored lowercase; the
//! subsection keeps its case and may contain dots and arbitrary characters.
//! The "section" of a key, for listing purposes, is everything before the
//! last dot (so `remote.origin.url` lives in section `remote.origin`).

use crate::error::{ConfigError, Result};
use regex::Regex;
use std::sync::LazyLock;

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9-]+(\.[^\n\x00]*)?\.[A-Za-z][A-Za-z0-9-]*$").expect("Invalid key regex")
});

/// Normalize a key the way the file backend reports it.
pub fn normalize(key: &str) -> String {
    let Some((section, rest)) = key.split_once('.') else {
        return key.to_lowercase();
    };
    match rest.rsplit_once('.') {
        Some((subsection, name)) => format!(
            "{}.{}.{}",
            section.to_lowercase(),
            subsection,
            name.to_lowercase()
        ),
        None => format!("{}.{}", section.to_lowercase(), rest.to_lowercase()),
    }
}

/// Normalize a section name (`section` or `section.subsection`).
pub fn normalize_section(section: &str) -> String {
    match section.split_once('.') {
        Some((head, subsection)) => format!("{}.{}", head.to_lowercase(), subsection),
        None => section.to_lowercase(),
    }
}

/// Split a key into its section and option name.
pub fn split(key: &str) -> Option<(&str, &str)> {
    key.rsplit_once('.')
}

/// Section part of a key, if it has one.
pub fn section_of(key: &str) -> Option<&str> {
    split(key).map(|(section, _)| section)
}

/// Join a section and an option name into a normalized key.
pub fn join(section: &str, option: &str) -> String {
    normalize(&format!("{}.{}", section, option))
}

/// Reject keys the file backend would refuse.
pub fn validate(key: &str) -> Result<()> {
    if KEY_PATTERN.is_match(key) {
        Ok(())
    } else {
        Err(ConfigError::CommandFailed(format!("invalid key: {}", key)))
    }
}
