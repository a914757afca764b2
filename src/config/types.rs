// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for extsort-rs.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig (logging), SortConfig (engine)
//! ```
//!
//! # Collision Policy
//!
//! ```text
//! CollisionPolicy: Overwrite (default) | Skip | Rename
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::logging::{LogFormat, LogLevel};

/// Default name of the output folder created inside the source folder.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "dist";

/// Default folder for files that have no extension.
pub const DEFAULT_NO_EXTENSION_DIR: &str = "noext";

/// What to do when the destination file name is already taken.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Keep the existing file and leave the source alone.
    Skip,
    /// Copy under the first free name `stem (N).ext`.
    Rename,
}

impl std::fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Skip => write!(f, "skip"),
            Self::Rename => write!(f, "rename"),
        }
    }
}

impl std::str::FromStr for CollisionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "skip" => Ok(Self::Skip),
            "rename" => Ok(Self::Rename),
            _ => Err(ConfigError::InvalidValue {
                section: "sort".to_string(),
                key: "collision".to_string(),
                message: format!("expected 'overwrite', 'skip', or 'rename', got '{s}'"),
            }),
        }
    }
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file. No file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// Format of the log file.
    pub log_format: LogFormat,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_format: LogFormat::Text,
        }
    }
}

/// Sorting engine options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortConfig {
    /// Output folder name used when no output path is given.
    pub output_dir_name: String,
    /// Folder receiving files without an extension.
    pub no_extension_dir: String,
    /// Maximum number of concurrent listings/copies (default: CPU count x 4).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    /// Destination name collision policy.
    pub collision: CollisionPolicy,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
    /// Copy access and modification times onto copied files.
    pub preserve_times: bool,
    /// Treat any per-file or per-directory failure as a failed run.
    pub strict: bool,
    /// Glob patterns (relative to the source folder) to skip.
    pub exclude: Vec<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            output_dir_name: DEFAULT_OUTPUT_DIR_NAME.to_string(),
            no_extension_dir: DEFAULT_NO_EXTENSION_DIR.to_string(),
            concurrency: None,
            collision: CollisionPolicy::default(),
            follow_links: true,
            preserve_times: true,
            strict: false,
            exclude: Vec::new(),
        }
    }
}
