// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered loading of `extsort.toml`, `--config` files and `EXTSORT_*` variables.
//!
//! ```text
//! ./extsort.toml            add_toml_file_optional   [optional]
//! --config a.toml ...       add_toml_file            [file]
//! Config::parse(str)        add_toml_str             [string]
//! EXTSORT_SORT__EXCLUDE=..  with_env_prefix          (last file layer)
//! --jobs, --strict, ...     set                      (overrides)
//!        |
//!        v
//!    build() --> Config (validated)
//! ```
//!
//! Later layers win key by key. Failures surface as [`ConfigError`]: a
//! missing `--config` file is a `ReadError`, malformed TOML or an unknown key
//! is a `ParseError`, and a well-formed but unusable value is an
//! `InvalidValue`.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{File, FileFormat};

use super::Config;
use crate::error::{ConfigError, Result};

/// Where a layer came from, as shown by `--print-config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    /// A `--config` file that must exist.
    Required,
    /// `extsort.toml` in the working directory, present.
    Optional,
    /// TOML text passed in directly.
    Inline,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "file",
            Self::Optional => "optional",
            Self::Inline => "string",
        })
    }
}

/// Collects configuration layers, then merges and validates them.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<(SourceKind, PathBuf)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    /// Adds a `--config` file.
    ///
    /// `build()` fails with `ConfigError::ReadError` if it cannot be read.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        self.sources.push((SourceKind::Required, path.to_path_buf()));
        self
    }

    /// Adds a file that is read only if it exists, like `./extsort.toml`.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(false));
        if path.exists() {
            self.sources.push((SourceKind::Optional, path.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources
            .push((SourceKind::Inline, PathBuf::from("<string>")));
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` environment variables.
    ///
    /// `EXTSORT_SORT__CONCURRENCY=8` sets `sort.concurrency`. `sort.exclude`
    /// accepts a comma-separated list.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Overrides `key` (dotted, e.g. `sort.collision`) above every other layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if `key` is not a valid path.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| ConfigError::ParseError {
                message: format!("override '{key}': {e}"),
            })?;
        Ok(self)
    }

    /// Merges every layer into a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`]:
    /// - `ReadError` if a `--config` file cannot be read.
    /// - `ParseError` if a layer is malformed, names an unknown key or has a
    ///   value of the wrong type.
    /// - `InvalidValue` if [`Config::validate`] rejects the merged result.
    pub fn build(self) -> Result<Config> {
        for (kind, path) in &self.sources {
            if *kind == SourceKind::Required
                && let Err(source) = std::fs::metadata(path)
            {
                return Err(ConfigError::ReadError {
                    path: path.display().to_string(),
                    source,
                }
                .into());
            }
        }

        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("sort.exclude"),
            ),
            None => self.builder,
        };
        let config: Config = builder
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// One `N. [kind] path` line per file layer, in load order.
    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, (kind, path))| format!("{}. [{kind}] {}", i + 1, path.display()))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
