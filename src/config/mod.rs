// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for extsort-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. extsort.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. EXTSORT_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! EXTSORT_SORT__CONCURRENCY=8        → sort.concurrency = 8
//! EXTSORT_SORT__COLLISION=rename     → sort.collision = "rename"
//! EXTSORT_SORT__EXCLUDE=**/.git,tmp  → sort.exclude = ["**/.git", "tmp"]
//! EXTSORT_GLOBAL__OUTPUT_LOG_LEVEL=4 → global.output_log_level = 4
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::Semaphore;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{GlobalConfig, SortConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Logging options.
    pub global: GlobalConfig,
    /// Sorting engine options.
    pub sort: SortConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use extsort_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("extsort.toml")
    ///     .with_env_prefix("EXTSORT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks values that deserialize fine but cannot drive a run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            section: "sort".to_string(),
            key: key.to_string(),
            message,
        };

        match self.sort.concurrency {
            Some(0) => return Err(invalid("concurrency", "must be at least 1".to_string())),
            Some(n) if n > Semaphore::MAX_PERMITS => {
                return Err(invalid(
                    "concurrency",
                    format!("must be at most {}, got {n}", Semaphore::MAX_PERMITS),
                ));
            }
            _ => {}
        }

        for (key, value) in [
            ("no_extension_dir", &self.sort.no_extension_dir),
            ("output_dir_name", &self.sort.output_dir_name),
        ] {
            validate_folder_name(value).map_err(|message| invalid(key, message))?;
        }

        for pattern in &self.sort.exclude {
            wax::Glob::new(pattern)
                .map_err(|e| invalid("exclude", format!("invalid glob '{pattern}': {e}")))?;
        }

        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();

        options.insert(
            "global.output_log_level".to_string(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".to_string(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file".to_string(),
            self.global
                .log_file
                .as_ref()
                .map_or_else(|| "<none>".to_string(), |p| p.display().to_string()),
        );
        options.insert(
            "global.log_format".to_string(),
            format!("{:?}", self.global.log_format).to_lowercase(),
        );

        options.insert(
            "sort.output_dir_name".to_string(),
            self.sort.output_dir_name.clone(),
        );
        options.insert(
            "sort.no_extension_dir".to_string(),
            self.sort.no_extension_dir.clone(),
        );
        options.insert(
            "sort.concurrency".to_string(),
            self.sort
                .concurrency
                .map_or_else(|| "auto".to_string(), |n| n.to_string()),
        );
        options.insert("sort.collision".to_string(), self.sort.collision.to_string());
        options.insert(
            "sort.follow_links".to_string(),
            self.sort.follow_links.to_string(),
        );
        options.insert(
            "sort.preserve_times".to_string(),
            self.sort.preserve_times.to_string(),
        );
        options.insert("sort.strict".to_string(), self.sort.strict.to_string());
        options.insert("sort.exclude".to_string(), self.sort.exclude.join(", "));

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

/// A folder name must be a single, non-empty path component.
fn validate_folder_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("must not be empty".to_string());
    }
    if name == "." || name == ".." {
        return Err(format!("'{name}' is not a folder name"));
    }
    if name.contains(['/', '\\']) {
        return Err(format!("'{name}' must not contain a path separator"));
    }
    Ok(())
}
