// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use extsort_rs::cli::Cli;
use extsort_rs::cli::global::GlobalOptions;
use extsort_rs::cli::sort::SortArgs;
use extsort_rs::config::types::CollisionPolicy;

// =============================================================================
// Command definition
// =============================================================================

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn cli_help_mentions_every_option() {
    let help = Cli::command().render_long_help().to_string();
    for flag in [
        "--config",
        "--log-level",
        "--file-log-level",
        "--log-file",
        "--log-format",
        "--jobs",
        "--collision",
        "--no-ext-dir",
        "--exclude",
        "--no-follow-links",
        "--no-preserve-times",
        "--strict",
        "--print-config",
    ] {
        assert!(help.contains(flag), "missing {flag}");
    }
}

#[test]
fn cli_version_flag() {
    let err = Cli::try_parse_from(["extsort", "--version"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
}

// =============================================================================
// Positionals
// =============================================================================

#[test]
fn cli_source_with_default_output() {
    let cli = Cli::try_parse_from(["extsort", "~/Downloads"]).unwrap();
    assert_eq!(cli.source, Some(PathBuf::from("~/Downloads")));
    assert!(cli.output.is_none());
}

#[test]
fn cli_options_after_positionals() {
    let cli = Cli::try_parse_from(["extsort", "in", "out", "--strict", "-j", "2"]).unwrap();
    assert_eq!(cli.source, Some(PathBuf::from("in")));
    assert_eq!(cli.output, Some(PathBuf::from("out")));
    assert!(cli.sort.strict);
    assert_eq!(cli.sort.jobs, Some(2));
}

#[test]
fn cli_too_many_positionals() {
    assert!(Cli::try_parse_from(["extsort", "a", "b", "c"]).is_err());
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn cli_default_options() {
    let cli = Cli::try_parse_from(["extsort", "src"]).unwrap();
    let GlobalOptions {
        configs,
        log_level,
        file_log_level,
        log_file,
        log_format,
    } = cli.global;
    assert!(configs.is_empty());
    assert!(log_level.is_none() && file_log_level.is_none());
    assert!(log_file.is_none() && log_format.is_none());

    let SortArgs {
        jobs,
        collision,
        no_extension_dir,
        exclude,
        no_follow_links,
        no_preserve_times,
        strict,
    } = cli.sort;
    assert!(jobs.is_none() && collision.is_none() && no_extension_dir.is_none());
    assert!(exclude.is_empty());
    assert!(!no_follow_links && !no_preserve_times && !strict);
}

#[test]
fn cli_every_collision_policy() {
    for (arg, policy) in [
        ("overwrite", CollisionPolicy::Overwrite),
        ("skip", CollisionPolicy::Skip),
        ("rename", CollisionPolicy::Rename),
    ] {
        let cli = Cli::try_parse_from(["extsort", "--collision", arg, "src"]).unwrap();
        assert_eq!(cli.sort.collision, Some(policy));
    }
}

#[test]
fn cli_repeated_config_files_keep_order() {
    let cli = Cli::try_parse_from([
        "extsort", "-c", "one.toml", "-c", "two.toml", "-c", "three.toml", "src",
    ])
    .unwrap();
    assert_eq!(
        cli.global.configs,
        ["one.toml", "two.toml", "three.toml"].map(PathBuf::from)
    );
}

#[test]
fn cli_invalid_jobs() {
    assert!(Cli::try_parse_from(["extsort", "-j", "many", "src"]).is_err());
}

#[test]
fn cli_print_config_with_overrides() {
    let cli = Cli::try_parse_from(["extsort", "--print-config", "--collision", "skip"]).unwrap();
    assert!(cli.print_config);

    let config = cli.config_loader().unwrap().build().unwrap();
    assert_eq!(config.sort.collision, CollisionPolicy::Skip);
    assert!(
        config
            .format_options()
            .iter()
            .any(|line| line.starts_with("sort.collision") && line.ends_with("= skip"))
    );
}
