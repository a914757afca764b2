// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for extsort-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! extsort [global options] [sort options] <SOURCE> [OUTPUT]
//! extsort [global options] [sort options] --print-config
//! ```
//!
//! Every option maps onto a configuration key and is applied as an override
//! on top of the TOML files and `EXTSORT_*` variables.

pub mod global;
pub mod sort;


use std::path::PathBuf;

use clap::Parser;

use crate::cli::global::GlobalOptions;
use crate::cli::sort::SortArgs;
use crate::config::Config;
use crate::config::loader::ConfigLoader;
use crate::error::Result;

/// Name of the config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "extsort.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "EXTSORT";

/// Extension Sorter
///
/// Copies every file below SOURCE into OUTPUT/<extension>/.
#[derive(Debug, Parser)]
#[command(
    name = "extsort",
    author,
    version,
    about = "Copy and organize files based on file extensions",
    long_about = "extsort-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Walks SOURCE recursively and copies every file into a folder of\n\
                  OUTPUT named after its lowercased extension. Files without an\n\
                  extension go to the `noext` folder. OUTPUT defaults to\n\
                  SOURCE/dist, which is never walked itself.",
    after_help = "CONFIG FILES:\n\n\
                  extsort reads `extsort.toml` from the current directory if it\n\
                  exists, then every file given with --config, in order. EXTSORT_*\n\
                  environment variables (e.g. EXTSORT_SORT__CONCURRENCY=8) override\n\
                  the files, and command-line options override everything."
)]
pub struct Cli {
    /// Source directory path
    #[arg(value_name = "SOURCE", required_unless_present = "print_config")]
    pub source: Option<PathBuf>,

    /// Destination directory path (default: 'dist' in the source directory)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Print the effective options and loaded config files, then exit
    #[arg(long = "print-config")]
    pub print_config: bool,

    /// Logging and configuration options
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Sorting options
    #[command(flatten)]
    pub sort: SortArgs,
}

impl Cli {
    /// Builds the configuration loader for this invocation.
    ///
    /// # Errors
    ///
    /// Returns an error if an override cannot be converted to a configuration value.
    pub fn config_loader(&self) -> Result<ConfigLoader> {
        let mut loader = Config::builder().add_toml_file_optional(LOCAL_CONFIG_FILE);
        for path in &self.global.configs {
            loader = loader.add_toml_file(path);
        }
        let loader = loader.with_env_prefix(ENV_PREFIX);

        let loader = self.global.apply_overrides(loader)?;
        self.sort.apply_overrides(loader)
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> std::result::Result<Cli, clap::Error> {
    Cli::try_parse()
}
