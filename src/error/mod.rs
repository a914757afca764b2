// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!        ExtsortError (~16 bytes)
//!              |
//!        +-----+-----+
//!        |           |
//!        v           v
//!     TopLevel     Config
//!       Box         Box
//!
//! ScanError and PlacementError never end a run. They travel as events and
//! are tallied in the run summary.
//!
//! Scope of each failure:
//!   TopLevel   whole run      SourceNotFound, CreateOutput, Interrupted
//!   Scan       one subtree    read_dir / classify failed
//!   Placement  one file       CreateDir, Reserve, SameFile, Copy
//!   Config     startup        ReadError, ParseError, InvalidValue
//! ```
//!
//! I/O sources are held in an `Arc` so every error is `Clone` and can travel
//! inside [`SortEvent`](crate::sort::report::SortEvent)s.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum ExtsortError {
    /// The run could not start or was aborted.
    #[error("run failed: {0}")]
    TopLevel(#[from] Box<TopLevelError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ExtsortError {
                fn from(err: $error) -> Self {
                    ExtsortError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    TopLevelError => TopLevel,
    ConfigError => Config,
}

// --- Top-level Errors ---

/// Failures that stop the whole run before or during traversal.
#[derive(Debug, Clone, Error)]
pub enum TopLevelError {
    /// The source root does not exist.
    #[error("source folder not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The source root exists but is not a directory.
    #[error("source is not a directory: {}", path.display())]
    SourceNotDirectory { path: PathBuf },

    /// The source root could not be inspected.
    #[error("cannot access source folder {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// The output root resolves to the source root itself.
    #[error("output folder must differ from the source folder: {}", path.display())]
    OutputIsSource { path: PathBuf },

    /// The output root could not be created.
    #[error("failed to create output folder {}: {source}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// The run was cancelled before traversal finished.
    #[error("run interrupted")]
    Interrupted,
}

// --- Scan Errors ---

/// What the walker was doing when a directory scan failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    /// Opening the directory listing.
    List,
    /// Reading the next entry of the listing.
    ReadEntry,
    /// Querying an entry's type.
    Classify,
}

impl ScanStage {
    /// Short verb phrase for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::ReadEntry => "read entry of",
            Self::Classify => "classify entry in",
        }
    }
}

/// Failure to list or classify the entries of one directory.
///
/// The directory's subtree is abandoned; siblings are unaffected.
#[derive(Debug, Clone, Error)]
#[error("failed to {} {}: {source}", stage.as_str(), dir.display())]
pub struct ScanError {
    dir: PathBuf,
    stage: ScanStage,
    #[source]
    source: Arc<io::Error>,
}

impl ScanError {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, stage: ScanStage, source: io::Error) -> Self {
        Self {
            dir: dir.into(),
            stage,
            source: Arc::new(source),
        }
    }

    /// Directory whose subtree was abandoned.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub const fn stage(&self) -> ScanStage {
        self.stage
    }

    /// Kind of the underlying I/O failure.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

// --- Placement Errors ---

/// Failure to place a single file.
#[derive(Debug, Clone, Error)]
pub enum PlacementError {
    /// The extension folder could not be created.
    #[error("failed to create folder {}: {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// A destination name could not be reserved.
    #[error("failed to reserve {}: {source}", destination.display())]
    Reserve {
        destination: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// The destination is the source file itself.
    #[error("refusing to copy {} onto itself ({})", file.display(), destination.display())]
    SameFile { file: PathBuf, destination: PathBuf },

    /// Copying the file's contents failed.
    #[error("failed to copy {} to {}: {source}", file.display(), destination.display())]
    Copy {
        file: PathBuf,
        destination: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
}

impl PlacementError {
    /// Kind of the underlying I/O failure.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::CreateDir { source, .. }
            | Self::Reserve { source, .. }
            | Self::Copy { source, .. } => source.kind(),
            Self::SameFile { .. } => io::ErrorKind::InvalidInput,
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to parse configuration.
    #[error("failed to parse config: {message}")]
    ParseError { message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

#[cfg(test)]
mod tests;
