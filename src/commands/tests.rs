//! Tests for the dsconfig commands.

use super::*;
use crate::test_support::{create_test_repo, isolated_options, write_dataset_tree, write_file};
use clap::Parser;
use tempfile::TempDir;

const CONFIG: &str = "\
[user]
\tname = Jane Doe
\temail = jd@example.com
[remote \"origin\"]
\turl = example:repo.git
\tfetch = +refs/heads/*:refs/remotes/origin/*
\tfetch = +refs/tags/*:refs/tags/*
[core]
\tsparse
[url \"git@example.com:\"]
\tinsteadOf = example:
";

fn manager(dir: &Path) -> ConfigManager {
    write_file(&dir.join("global.gitconfig"), CONFIG);
    ConfigManager::new(isolated_options(dir)).unwrap()
}

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["dsconfig"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn get_args(key: &str) -> GetArgs {
    GetArgs {
        key: key.to_string(),
        default: None,
        value_type: None,
        show_origin: false,
    }
}

#[test]
fn test_get_scalar_and_multi() {
    let temp_dir = TempDir::new().unwrap();
    let cfg = manager(temp_dir.path());

    assert_eq!(cmd_get(&cfg, &get_args("user.name")).unwrap(), "Jane Doe");
    assert_eq!(
        cmd_get(&cfg, &get_args("remote.origin.fetch")).unwrap(),
        "+refs/heads/*:refs/remotes/origin/*\n+refs/tags/*:refs/tags/*"
    );
    assert!(matches!(
        cmd_get(&cfg, &get_args("no.such")),
        Err(ConfigError::KeyNotFound(_))
    ));
}

#[test]
fn test_get_default_type_and_origin() {
    let temp_dir = TempDir::new().unwrap();
    let cfg = manager(temp_dir.path());

    let mut args = get_args("no.such");
    args.default = Some("42".to_string());
    args.value_type = Some("int".to_string());
    assert_eq!(cmd_get(&cfg, &args).unwrap(), "42");

    let mut args = get_args("core.sparse");
    args.value_type = Some("bool".to_string());
    assert_eq!(cmd_get(&cfg, &args).unwrap(), "true");

    let mut args = get_args("user.name");
    args.value_type = Some("complex".to_string());
    assert!(matches!(
        cmd_get(&cfg, &args),
        Err(ConfigError::InvalidArgument(_))
    ));

    let mut args = get_args("user.email");
    args.show_origin = true;
    assert_eq!(cmd_get(&cfg, &args).unwrap(), "global\tjd@example.com");
}

#[test]
fn test_list_plain_and_json() {
    let temp_dir = TempDir::new().unwrap();
    let cfg = manager(temp_dir.path());

    let listing = cmd_list(
        &cfg,
        &ListArgs {
            section: Some("user".to_string()),
            json: false,
        },
    )
    .unwrap();
    assert_eq!(listing, "user.email=jd@example.com\nuser.name=Jane Doe");

    let listing = cmd_list(
        &cfg,
        &ListArgs {
            section: None,
            json: false,
        },
    )
    .unwrap();
    assert!(listing.lines().any(|line| line == "core.sparse"));
    assert_eq!(
        listing
            .lines()
            .filter(|line| line.starts_with("remote.origin.fetch="))
            .count(),
        2
    );

    let json = cmd_list(
        &cfg,
        &ListArgs {
            section: Some("remote.origin".to_string()),
            json: true,
        },
    )
    .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["remote.origin.url"], "example:repo.git");
    assert_eq!(parsed["remote.origin.fetch"].as_array().unwrap().len(), 2);
}

#[test]
fn test_sections_layers_and_rewrite() {
    let temp_dir = TempDir::new().unwrap();
    let cfg = manager(temp_dir.path());

    assert_eq!(
        cmd_sections(&cfg),
        "core\nremote.origin\nurl.git@example.com:\nuser"
    );

    let layers = cmd_layers(&cfg, &LayersArgs { json: false }).unwrap();
    let lines: Vec<&str> = layers.lines().collect();
    assert!(lines[0].starts_with("system"));
    assert!(lines[0].contains("missing"));
    assert!(lines[1].starts_with("global"));
    assert!(lines[1].contains("present"));

    let json = cmd_layers(&cfg, &LayersArgs { json: true }).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[1]["scope"], "global");

    assert_eq!(
        cmd_rewrite_url(
            &cfg,
            &RewriteUrlArgs {
                url: "example:datalad.git".to_string()
            }
        ),
        "git@example.com:datalad.git"
    );
}

#[test]
fn test_dispatch_writes_to_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let ds = write_dataset_tree(temp_dir.path(), "");
    let ds_arg = ds.to_string_lossy().to_string();

    dispatch_with(
        cli(&["-d", &ds_arg, "set", "datalad.dataset.id", "1234"]),
        isolated_options(temp_dir.path()),
    )
    .unwrap();
    dispatch_with(
        cli(&["-d", &ds_arg, "add", "extra.item", "one"]),
        isolated_options(temp_dir.path()),
    )
    .unwrap();

    let cfg = ConfigManager::new(
        isolated_options(temp_dir.path())
            .dataset(Dataset::new(&ds))
            .source(Source::Dataset),
    )
    .unwrap();
    assert_eq!(
        cfg.get("datalad.dataset.id"),
        Some(&ConfigValue::from("1234"))
    );
    assert!(cfg.contains("extra.item"));

    dispatch_with(
        cli(&["-d", &ds_arg, "rename-section", "extra", "other"]),
        isolated_options(temp_dir.path()),
    )
    .unwrap();
    dispatch_with(
        cli(&["-d", &ds_arg, "remove-section", "other"]),
        isolated_options(temp_dir.path()),
    )
    .unwrap();
    dispatch_with(
        cli(&["-d", &ds_arg, "unset", "datalad.dataset.id"]),
        isolated_options(temp_dir.path()),
    )
    .unwrap();

    let cfg = ConfigManager::new(
        isolated_options(temp_dir.path())
            .dataset(Dataset::new(&ds))
            .source(Source::Dataset),
    )
    .unwrap();
    assert!(cfg.is_empty());
}

#[test]
fn test_dispatch_where_selects_layer() {
    let repo = create_test_repo();
    let config_dir = TempDir::new().unwrap();
    let repo_arg = repo.path().to_string_lossy().to_string();

    dispatch_with(
        cli(&["-d", &repo_arg, "set", "a.b", "local", "--where", "local"]),
        isolated_options(config_dir.path()),
    )
    .unwrap();
    dispatch_with(
        cli(&["set", "a.b", "global"]),
        isolated_options(config_dir.path()),
    )
    .unwrap();

    let cfg = ConfigManager::new(
        isolated_options(config_dir.path()).dataset(Dataset::new(repo.path())),
    )
    .unwrap();
    assert_eq!(cfg.get("a.b"), Some(&ConfigValue::from("local")));
    assert_eq!(cfg.origin("a.b"), Some(Scope::Local));
    let global = ConfigManager::new(isolated_options(config_dir.path())).unwrap();
    assert_eq!(global.get("a.b"), Some(&ConfigValue::from("global")));
}

#[test]
fn test_dispatch_rejects_bad_arguments() {
    let temp_dir = TempDir::new().unwrap();
    assert!(matches!(
        dispatch_with(
            cli(&["--source", "locale", "sections"]),
            isolated_options(temp_dir.path())
        ),
        Err(ConfigError::InvalidArgument(_))
    ));
    assert!(matches!(
        dispatch_with(
            cli(&["set", "a.b", "c", "--where", "system"]),
            isolated_options(temp_dir.path())
        ),
        Err(ConfigError::InvalidArgument(_))
    ));
    assert!(matches!(
        dispatch_with(
            cli(&["set", "a.b", "c", "--where", "override"]),
            isolated_options(temp_dir.path())
        ),
        Err(ConfigError::InvalidArgument(_))
    ));
    assert!(!temp_dir.path().join("global.gitconfig").exists());
    assert!(matches!(
        dispatch_with(
            cli(&["--source", "dataset", "sections"]),
            isolated_options(temp_dir.path())
        ),
        Err(ConfigError::InvalidArgument(_))
    ));
    assert!(matches!(
        dispatch_with(
            cli(&["unset", "never.set"]),
            isolated_options(temp_dir.path())
        ),
        Err(ConfigError::CommandFailed(_))
    ));
}
