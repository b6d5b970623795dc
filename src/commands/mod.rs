//! Command implementations for dsconfig.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Read-only commands render into a `String` so the output
//! can be checked without capturing stdout.

use crate::cli::{
    AddArgs, Cli, Command, GetArgs, LayersArgs, ListArgs, RemoveSectionArgs, RenameSectionArgs,
    RewriteUrlArgs, SetArgs, UnsetArgs, WhereArgs,
};
use crate::dataset::Dataset;
use crate::error::{ConfigError, Result};
use crate::store::{ConfigManager, ConfigOptions, WriteOptions};
use crate::types::{Scope, Source};
use crate::value::{ConfigValue, ValueType};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<()> {
    dispatch_with(cli, ConfigOptions::new())
}

/// Dispatch with a preconfigured set of manager options.
///
/// `--dataset` and `--source` from the command line are applied on top.
pub fn dispatch_with(cli: Cli, options: ConfigOptions) -> Result<()> {
    let mut manager = open_manager(cli.dataset.as_deref(), &cli.source, options)?;

    match cli.command {
        Command::Get(args) => print(cmd_get(&manager, &args)?),
        Command::List(args) => print(cmd_list(&manager, &args)?),
        Command::Sections => print(cmd_sections(&manager)),
        Command::Layers(args) => print(cmd_layers(&manager, &args)?),
        Command::Add(args) => cmd_add(&mut manager, args),
        Command::Set(args) => cmd_set(&mut manager, args),
        Command::Unset(args) => cmd_unset(&mut manager, args),
        Command::RenameSection(args) => cmd_rename_section(&mut manager, args),
        Command::RemoveSection(args) => cmd_remove_section(&mut manager, args),
        Command::RewriteUrl(args) => print(cmd_rewrite_url(&manager, &args)),
    }
}

fn print(output: String) -> Result<()> {
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Build the manager for a command line.
fn open_manager(
    dataset: Option<&Path>,
    source: &str,
    options: ConfigOptions,
) -> Result<ConfigManager> {
    let mut options = options.source(Source::parse(source)?);
    if let Some(path) = dataset {
        let dataset = match Dataset::discover(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                // a directory with only .datalad/config is still a dataset
                debug!(path = %path.display(), "no repository found: {}", e);
                Dataset::new(path)
            }
        };
        options = options.dataset(dataset);
    }
    ConfigManager::new(options)
}

fn write_options(location: &WhereArgs) -> Result<WriteOptions> {
    let target = location
        .target
        .as_deref()
        .map(Scope::parse_target)
        .transpose()?;
    // overrides live in this process only
    if target == Some(Scope::Override) {
        return Err(ConfigError::InvalidArgument(
            "override values do not outlive the command; choose local, global, or dataset"
                .to_string(),
        ));
    }
    Ok(WriteOptions::from(target))
}

// ============================================================================
// Read-only commands
// ============================================================================

fn cmd_get(manager: &ConfigManager, args: &GetArgs) -> Result<String> {
    let value = match (manager.get(&args.key), &args.default) {
        (Some(value), _) => value.clone(),
        (None, Some(default)) => ConfigValue::from(default.as_str()),
        (None, None) => return Err(ConfigError::KeyNotFound(args.key.clone())),
    };

    let rendered = match &args.value_type {
        Some(name) => {
            let value_type = ValueType::from_str(name).ok_or_else(|| {
                ConfigError::InvalidArgument(format!(
                    "unknown type '{}' (expected one of: str, int, float, bool)",
                    name
                ))
            })?;
            value_type.coerce(&value)?.to_string()
        }
        None => value.to_string(),
    };

    if args.show_origin {
        let origin = manager
            .origin(&args.key)
            .map_or("default", |scope| scope.as_str());
        return Ok(rendered
            .lines()
            .map(|line| format!("{}\t{}", origin, line))
            .collect::<Vec<_>>()
            .join("\n"));
    }
    Ok(rendered)
}

fn cmd_list(manager: &ConfigManager, args: &ListArgs) -> Result<String> {
    let items = manager.items(args.section.as_deref());

    if args.json {
        let map: BTreeMap<&str, &ConfigValue> = items.into_iter().collect();
        return serde_json::to_string_pretty(&map)
            .map_err(|e| ConfigError::InvalidValue(format!("failed to serialize listing: {}", e)));
    }

    let mut lines = Vec::new();
    for (k, value) in items {
        match value {
            ConfigValue::Flag => lines.push(k.to_string()),
            other => lines.extend(other.values().into_iter().map(|v| format!("{}={}", k, v))),
        }
    }
    Ok(lines.join("\n"))
}

fn cmd_sections(manager: &ConfigManager) -> String {
    manager.sections().join("\n")
}

fn cmd_layers(manager: &ConfigManager, args: &LayersArgs) -> Result<String> {
    let layers = manager.layers();

    if args.json {
        return serde_json::to_string_pretty(&layers)
            .map_err(|e| ConfigError::InvalidValue(format!("failed to serialize layers: {}", e)));
    }

    Ok(layers
        .iter()
        .map(|layer| {
            let location = layer
                .path
                .as_ref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string());
            let state = if layer.present { "present" } else { "missing" };
            format!(
                "{:<12} {:<8} {:>4}  {}",
                layer.scope.as_str(),
                state,
                layer.keys,
                location
            )
        })
        .collect::<Vec<_>>()
        .join("\n"))
}

fn cmd_rewrite_url(manager: &ConfigManager, args: &RewriteUrlArgs) -> String {
    manager.rewrite_url(&args.url)
}

// ============================================================================
// Mutating commands
// ============================================================================

fn cmd_add(manager: &mut ConfigManager, args: AddArgs) -> Result<()> {
    let opts = write_options(&args.location)?;
    manager.add(&args.key, &args.value, opts)
}

fn cmd_set(manager: &mut ConfigManager, args: SetArgs) -> Result<()> {
    let opts = write_options(&args.location)?;
    manager.set(&args.key, &args.value, args.force, opts)
}

fn cmd_unset(manager: &mut ConfigManager, args: UnsetArgs) -> Result<()> {
    let opts = write_options(&args.location)?;
    manager.unset(&args.key, opts)
}

fn cmd_rename_section(manager: &mut ConfigManager, args: RenameSectionArgs) -> Result<()> {
    let opts = write_options(&args.location)?;
    manager.rename_section(&args.old, &args.new, opts)
}

fn cmd_remove_section(manager: &mut ConfigManager, args: RemoveSectionArgs) -> Result<()> {
    let opts = write_options(&args.location)?;
    manager.remove_section(&args.name, opts)
}

#[cfg(test)]
mod tests;
