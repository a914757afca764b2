// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Run events and the reporters that consume them.
//!
//! ```text
//! Sorter ──SortEvent──> dyn Reporter
//!                         TracingReporter  tracing::info!/error!
//!                         ChannelReporter  flume::Sender<SortEvent>
//!                         NullReporter     drop
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{PlacementError, ScanError, TopLevelError};

/// Final state of one file placement.
#[derive(Debug, Clone)]
pub enum PlacementStatus {
    /// The file was copied to `destination`.
    Copied { destination: PathBuf, bytes: u64 },
    /// The destination name was taken and the collision policy said skip.
    Skipped { destination: PathBuf },
    /// The file could not be placed.
    Failed(PlacementError),
}

/// Result of placing a single source file.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    source: PathBuf,
    destination_dir: PathBuf,
    status: PlacementStatus,
}

impl PlacementOutcome {
    #[must_use]
    pub const fn new(source: PathBuf, destination_dir: PathBuf, status: PlacementStatus) -> Self {
        Self {
            source,
            destination_dir,
            status,
        }
    }

    /// The source file this outcome belongs to.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The extension folder the file was routed to.
    #[must_use]
    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    #[must_use]
    pub const fn status(&self) -> &PlacementStatus {
        &self.status
    }

    /// Final file path, unless the placement failed.
    #[must_use]
    pub fn destination(&self) -> Option<&Path> {
        match &self.status {
            PlacementStatus::Copied { destination, .. }
            | PlacementStatus::Skipped { destination } => Some(destination),
            PlacementStatus::Failed(_) => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&PlacementError> {
        match &self.status {
            PlacementStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self.status, PlacementStatus::Failed(_))
    }

    /// Display name of the source file.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.source.file_name().map_or_else(
            || self.source.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// Aggregate tallies of one run.
///
/// A run that reaches the end of traversal is "completed" even when some
/// items failed; [`RunSummary::is_clean`] tells the two apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub directories_scanned: usize,
    pub files_copied: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub scan_errors: usize,
    pub bytes_copied: u64,
}

impl RunSummary {
    /// Files and directories that could not be processed.
    #[must_use]
    pub const fn failure_count(&self) -> usize {
        self.files_failed + self.scan_errors
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    /// Every file that produced an outcome.
    #[must_use]
    pub const fn files_visited(&self) -> usize {
        self.files_copied + self.files_skipped + self.files_failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "copied={} skipped={} failed={} directories={} scan_errors={} bytes={}",
            self.files_copied,
            self.files_skipped,
            self.files_failed,
            self.directories_scanned,
            self.scan_errors,
            self.bytes_copied
        )
    }
}

/// Something observable that happened during a run.
#[derive(Debug, Clone)]
pub enum SortEvent {
    /// Traversal is about to start.
    Started { source: PathBuf, output: PathBuf },
    /// A file was copied.
    FileCopied(PlacementOutcome),
    /// A file was left alone because its destination name was taken.
    FileSkipped(PlacementOutcome),
    /// A file could not be placed.
    FileError(PlacementOutcome),
    /// A directory could not be scanned; its subtree was abandoned.
    ScanError(ScanError),
    /// Traversal reached the end.
    RunCompleted(RunSummary),
    /// The run failed as a whole.
    RunError(TopLevelError),
}

impl SortEvent {
    /// Wraps an outcome in the event matching its status.
    #[must_use]
    pub fn from_outcome(outcome: PlacementOutcome) -> Self {
        match outcome.status {
            PlacementStatus::Copied { .. } => Self::FileCopied(outcome),
            PlacementStatus::Skipped { .. } => Self::FileSkipped(outcome),
            PlacementStatus::Failed(_) => Self::FileError(outcome),
        }
    }

    /// Stable snake_case name of the event kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::FileCopied(_) => "file_copied",
            Self::FileSkipped(_) => "file_skipped",
            Self::FileError(_) => "file_error",
            Self::ScanError(_) => "scan_error",
            Self::RunCompleted(_) => "run_completed",
            Self::RunError(_) => "run_error",
        }
    }
}

/// Receives the events of a run.
///
/// Called concurrently from many tasks; implementations must not block for
/// long.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &SortEvent);
}

/// Renders events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &SortEvent) {
        match event {
            SortEvent::Started { source, output } => {
                tracing::info!(
                    source = %source.display(),
                    output = %output.display(),
                    "Sorting files by extension"
                );
            }
            SortEvent::FileCopied(outcome) => {
                tracing::info!(
                    file = %outcome.source().display(),
                    "Copied {} to {}",
                    outcome.file_name(),
                    outcome.destination_dir().display()
                );
            }
            SortEvent::FileSkipped(outcome) => {
                tracing::info!(
                    file = %outcome.source().display(),
                    "Skipped {}, already present in {}",
                    outcome.file_name(),
                    outcome.destination_dir().display()
                );
            }
            SortEvent::FileError(outcome) => {
                if let Some(err) = outcome.error() {
                    tracing::error!(
                        file = %outcome.source().display(),
                        error = %err,
                        "Error copying {}",
                        outcome.file_name()
                    );
                }
            }
            SortEvent::ScanError(err) => {
                tracing::error!(dir = %err.dir().display(), error = %err, "Read folder error");
            }
            SortEvent::RunCompleted(summary) => {
                if summary.is_clean() {
                    tracing::info!(%summary, "Sorting files into folders has been completed successfully");
                } else {
                    tracing::warn!(
                        %summary,
                        failures = summary.failure_count(),
                        "Sorting files into folders completed with failures"
                    );
                }
            }
            SortEvent::RunError(err) => {
                tracing::error!(error = %err, "Sorting failed");
            }
        }
    }
}

/// Forwards every event into a `flume` channel.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: flume::Sender<SortEvent>,
}

impl ChannelReporter {
    /// Creates a reporter and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, flume::Receiver<SortEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self { tx }, rx)
    }
}

impl Reporter for ChannelReporter {
    fn report(&self, event: &SortEvent) {
        // Receiver may be gone; the run itself does not depend on it
        let _ = self.tx.send(event.clone());
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &SortEvent) {}
}
