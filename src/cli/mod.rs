//! CLI argument parsing for dsconfig.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dsconfig: inspect and edit layered dataset configuration.
///
/// Configuration is merged from, lowest to highest precedence:
/// system, global, local (.git/config), dataset (.datalad/config),
/// process overrides, and DATALAD_* environment variables.
#[derive(Parser, Debug)]
#[command(name = "dsconfig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Dataset to read configuration from (any path inside it).
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Configuration files to read: dataset, local, dataset-local, or any.
    #[arg(long, global = true, default_value = "any")]
    pub source: String,

    /// Log file discovery and writes to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for dsconfig.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value of a key.
    ///
    /// Repeated keys print one value per line.
    Get(GetArgs),

    /// List keys and values, optionally restricted to a section.
    List(ListArgs),

    /// List section names.
    Sections,

    /// Show which files and layers contribute configuration.
    Layers(LayersArgs),

    /// Append a value to a key, keeping existing values.
    Add(AddArgs),

    /// Set a key to a single value.
    Set(SetArgs),

    /// Remove all values of a key.
    Unset(UnsetArgs),

    /// Rename a section.
    RenameSection(RenameSectionArgs),

    /// Remove a section and all of its keys.
    RemoveSection(RemoveSectionArgs),

    /// Apply url.<base>.insteadOf rewrites to a URL.
    RewriteUrl(RewriteUrlArgs),
}

/// Arguments for the `get` command.
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Key to look up (e.g., user.name).
    pub key: String,

    /// Value to print when the key is not set.
    #[arg(long)]
    pub default: Option<String>,

    /// Interpret the value as str, int, float, or bool.
    #[arg(long = "type")]
    pub value_type: Option<String>,

    /// Also print the layer the value comes from.
    #[arg(long)]
    pub show_origin: bool,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list keys under this section.
    pub section: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `layers` command.
#[derive(Parser, Debug)]
pub struct LayersArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Layer selection shared by mutating commands.
#[derive(Parser, Debug)]
pub struct WhereArgs {
    /// Layer to write: local, global, or dataset.
    ///
    /// Defaults to dataset when --dataset is given, global otherwise.
    #[arg(long = "where")]
    pub target: Option<String>,
}

/// Arguments for the `add` command.
#[derive(Parser, Debug)]
pub struct AddArgs {
    pub key: String,
    pub value: String,

    #[command(flatten)]
    pub location: WhereArgs,
}

/// Arguments for the `set` command.
#[derive(Parser, Debug)]
pub struct SetArgs {
    pub key: String,
    pub value: String,

    /// Replace all existing values if the key is repeated.
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub location: WhereArgs,
}

/// Arguments for the `unset` command.
#[derive(Parser, Debug)]
pub struct UnsetArgs {
    pub key: String,

    #[command(flatten)]
    pub location: WhereArgs,
}

/// Arguments for the `rename-section` command.
#[derive(Parser, Debug)]
pub struct RenameSectionArgs {
    pub old: String,
    pub new: String,

    #[command(flatten)]
    pub location: WhereArgs,
}

/// Arguments for the `remove-section` command.
#[derive(Parser, Debug)]
pub struct RemoveSectionArgs {
    pub name: String,

    #[command(flatten)]
    pub location: WhereArgs,
}

/// Arguments for the `rewrite-url` command.
#[derive(Parser, Debug)]
pub struct RewriteUrlArgs {
    pub url: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
