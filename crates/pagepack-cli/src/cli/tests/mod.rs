//! CLI parse tests.

use super::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

fn parse(args: &[&str]) -> Option<CliCommand> {
    Cli::try_parse_from(args).unwrap().command
}

#[test]
fn cli_parse_no_args_defaults_to_build() {
    assert!(parse(&["pagepack"]).is_none());
}

#[test]
fn cli_parse_build() {
    match parse(&["pagepack", "build"]) {
        Some(CliCommand::Build { project }) => {
            assert!(project.root.is_none());
            assert!(project.config.is_none());
        }
        _ => panic!("expected Build"),
    }
}

#[test]
fn cli_parse_build_with_root_and_config() {
    match parse(&[
        "pagepack",
        "build",
        "--root",
        "/srv/report",
        "--config",
        "custom.toml",
    ]) {
        Some(CliCommand::Build { project }) => {
            assert_eq!(project.root.as_deref(), Some(Path::new("/srv/report")));
            assert_eq!(project.config.as_deref(), Some(Path::new("custom.toml")));
            assert_eq!(project.project_root().unwrap(), Path::new("/srv/report"));
        }
        _ => panic!("expected Build with --root/--config"),
    }
}

#[test]
fn cli_parse_list() {
    match parse(&["pagepack", "list", "--root", "/tmp"]) {
        Some(CliCommand::List { project }) => {
            assert_eq!(project.root.as_deref(), Some(Path::new("/tmp")));
        }
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_parse_init_config() {
    match parse(&["pagepack", "init-config"]) {
        Some(CliCommand::InitConfig { root }) => assert!(root.is_none()),
        _ => panic!("expected InitConfig"),
    }
}

#[test]
fn cli_rejects_unknown_flag() {
    assert!(Cli::try_parse_from(["pagepack", "build", "--fast"]).is_err());
}

#[test]
fn init_config_writes_file_once() {
    let dir = tempfile::tempdir().unwrap();
    super::commands::run_init_config(dir.path()).unwrap();
    assert!(dir.path().join("pagepack.toml").exists());
    assert!(super::commands::run_init_config(dir.path()).is_err());
}
