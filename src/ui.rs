//! Interactive prompt collaborator.
//!
//! `obtain` asks a [`Prompter`] for values it cannot find. Rendering dialogs
//! is left to the embedding application; this module ships a scripted
//! prompter for non-interactive use and tests, and a prompter that refuses
//! to ask at all.

use crate::error::{ConfigError, Result};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Keyword arguments for a dialog (`text`, `title`, `default`, ...).
pub type DialogArgs = BTreeMap<String, String>;

/// Dialog types understood by the shipped prompters.
pub const DIALOG_TYPES: &[&str] = &["question", "yesno"];

/// Asks a human for a value and returns the raw response.
pub trait Prompter: fmt::Debug {
    /// Show a dialog of `dialog_type` and return the response.
    ///
    /// Unknown dialog types must be rejected with
    /// [`ConfigError::InvalidArgument`].
    fn prompt(&mut self, dialog_type: &str, args: &DialogArgs) -> Result<String>;
}

fn check_dialog_type(dialog_type: &str) -> Result<()> {
    if DIALOG_TYPES.contains(&dialog_type) {
        Ok(())
    } else {
        Err(ConfigError::InvalidArgument(format!(
            "unknown dialog type '{}' (expected one of: {})",
            dialog_type,
            DIALOG_TYPES.join(", ")
        )))
    }
}

/// Prompter that cannot ask anybody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompter;

impl Prompter for NoPrompter {
    fn prompt(&mut self, dialog_type: &str, args: &DialogArgs) -> Result<String> {
        check_dialog_type(dialog_type)?;
        let text = args.get("text").map(String::as_str).unwrap_or("value");
        Err(ConfigError::Unresolvable(format!(
            "cannot ask for '{}': no interactive prompt available",
            text
        )))
    }
}

/// Prompter answering from a queue of canned responses.
///
/// An empty response accepts the dialog's `default` argument when one is
/// given.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    responses: VecDeque<String>,
    asked: Vec<(String, DialogArgs)>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Dialogs shown so far, with their arguments.
    pub fn asked(&self) -> &[(String, DialogArgs)] {
        &self.asked
    }

    /// Responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, dialog_type: &str, args: &DialogArgs) -> Result<String> {
        check_dialog_type(dialog_type)?;
        self.asked.push((dialog_type.to_string(), args.clone()));
        let response = self.responses.pop_front().ok_or_else(|| {
            ConfigError::Unresolvable("no scripted response left to answer the dialog".to_string())
        })?;
        match args.get("default") {
            Some(default) if response.is_empty() => Ok(default.clone()),
            _ => Ok(response),
        }
    }
}
