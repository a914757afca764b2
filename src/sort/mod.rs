// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Concurrent traversal-and-copy engine.
//!
//! # Architecture
//!
//! ```text
//! Sorter::run(source, output?)
//!   |  source must be a directory        --> TopLevelError
//!   |  output = output? | source/dist, created
//!   v
//! walk(source) ── JoinSet per directory ──┬── walk(subdir) ...
//!                                         └── place(file)
//!                                               |
//!                                               v
//!                                    output/<lowercase ext>/<name>
//!
//! RunContext (Arc, shared by every task)
//!   output root, options, excludes   read-only
//!   Semaphore                        caps concurrent listings + copies
//!   CancellationToken                stops new work
//!   Tally                            atomic counters --> RunSummary
//! ```
//!
//! # Failure Scopes
//!
//! | Error | Scope | Effect |
//! |-------|-------|--------|
//! | [`TopLevelError`] | run | returned from [`Sorter::run`] |
//! | [`ScanError`](crate::error::ScanError) | directory | subtree abandoned, reported |
//! | [`PlacementError`](crate::error::PlacementError) | file | reported, siblings continue |

pub mod place;
pub mod report;
pub mod walk;


use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use bon::Builder;
use tokio::fs;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio_util::sync::CancellationToken;
use wax::{Glob, Program as _};

use crate::config::types::{
    CollisionPolicy, DEFAULT_NO_EXTENSION_DIR, DEFAULT_OUTPUT_DIR_NAME, SortConfig,
};
use crate::error::{ConfigError, TopLevelError};

use report::{PlacementOutcome, PlacementStatus, Reporter, RunSummary, SortEvent};

/// Options controlling a sort run.
#[derive(Debug, Clone, Builder)]
pub struct SortOptions {
    /// Folder name for files without an extension.
    #[builder(setters(name = with_no_extension_dir), into, default = DEFAULT_NO_EXTENSION_DIR.to_string())]
    no_extension_dir: String,
    /// Output folder name used when no output path is given.
    #[builder(setters(name = with_output_dir_name), into, default = DEFAULT_OUTPUT_DIR_NAME.to_string())]
    output_dir_name: String,
    /// Maximum concurrent listings/copies (None = CPU count x 4).
    #[builder(setters(name = with_concurrency))]
    concurrency: Option<usize>,
    #[builder(setters(name = with_collision), default)]
    collision: CollisionPolicy,
    #[builder(setters(name = with_follow_links), default = true)]
    follow_links: bool,
    #[builder(setters(name = with_preserve_times), default = true)]
    preserve_times: bool,
    /// Glob patterns, relative to the source root, of entries to skip.
    #[builder(setters(name = with_exclude), default)]
    exclude: Vec<String>,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SortOptions {
    /// Builds options from the `[sort]` configuration section.
    #[must_use]
    pub fn from_config(config: &SortConfig) -> Self {
        Self::builder()
            .with_no_extension_dir(config.no_extension_dir.clone())
            .with_output_dir_name(config.output_dir_name.clone())
            .maybe_with_concurrency(config.concurrency)
            .with_collision(config.collision)
            .with_follow_links(config.follow_links)
            .with_preserve_times(config.preserve_times)
            .with_exclude(config.exclude.clone())
            .build()
    }

    #[must_use]
    pub fn no_extension_dir(&self) -> &str {
        &self.no_extension_dir
    }

    #[must_use]
    pub fn output_dir_name(&self) -> &str {
        &self.output_dir_name
    }

    #[must_use]
    pub const fn concurrency(&self) -> Option<usize> {
        self.concurrency
    }

    /// Concurrency limit actually used for a run, within `1..=Semaphore::MAX_PERMITS`.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(std::num::NonZeroUsize::get)
                    .unwrap_or(4)
                    * 4
            })
            .clamp(1, Semaphore::MAX_PERMITS)
    }

    #[must_use]
    pub const fn collision(&self) -> CollisionPolicy {
        self.collision
    }

    #[must_use]
    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    #[must_use]
    pub const fn preserve_times(&self) -> bool {
        self.preserve_times
    }

    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    fn compile_excludes(&self) -> Result<Vec<Glob<'static>>, ConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                Glob::new(pattern)
                    .map(Glob::into_owned)
                    .map_err(|e| ConfigError::InvalidValue {
                        section: "sort".to_string(),
                        key: "exclude".to_string(),
                        message: format!("invalid glob '{pattern}': {e}"),
                    })
            })
            .collect()
    }
}

/// Sorts a directory tree into per-extension folders.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use extsort_rs::sort::{SortOptions, Sorter};
/// use extsort_rs::sort::report::TracingReporter;
///
/// # async fn example() -> anyhow::Result<()> {
/// let sorter = Sorter::new(SortOptions::default(), Arc::new(TracingReporter))?;
/// let summary = sorter.run(Path::new("downloads"), None).await?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
pub struct Sorter {
    options: Arc<SortOptions>,
    excludes: Arc<[Glob<'static>]>,
    reporter: Arc<dyn Reporter>,
    cancel_token: CancellationToken,
}

impl Sorter {
    /// Creates a sorter reporting to `reporter`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if an exclude pattern is not a valid glob.
    pub fn new(options: SortOptions, reporter: Arc<dyn Reporter>) -> Result<Self, ConfigError> {
        let excludes = options.compile_excludes()?;
        Ok(Self {
            options: Arc::new(options),
            excludes: excludes.into(),
            reporter,
            cancel_token: CancellationToken::new(),
        })
    }

    /// Replaces the cancellation token.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Returns the cancellation token for sharing with signal handlers.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    #[must_use]
    pub fn options(&self) -> &SortOptions {
        &self.options
    }

    /// Output root used when none is given: `<source>/<output_dir_name>`.
    #[must_use]
    pub fn default_output(&self, source: &Path) -> PathBuf {
        source.join(self.options.output_dir_name())
    }

    /// Sorts `source` into `output` (or the default output root).
    ///
    /// Per-file and per-directory failures are reported and tallied; only
    /// failures that prevent the run as a whole are returned. Emits
    /// `RunCompleted` or `RunError` as the last event.
    ///
    /// # Errors
    ///
    /// Returns a [`TopLevelError`] if the source is missing or not a directory,
    /// the output root cannot be created or equals the source, or the run was
    /// cancelled.
    pub async fn run(
        &self,
        source: &Path,
        output: Option<&Path>,
    ) -> Result<RunSummary, TopLevelError> {
        match self.run_inner(source, output).await {
            Ok(summary) => {
                self.reporter.report(&SortEvent::RunCompleted(summary));
                Ok(summary)
            }
            Err(err) => {
                self.reporter.report(&SortEvent::RunError(err.clone()));
                Err(err)
            }
        }
    }

    async fn run_inner(
        &self,
        source: &Path,
        output: Option<&Path>,
    ) -> Result<RunSummary, TopLevelError> {
        let source_root = resolve_source(source).await?;

        let output = output.map_or_else(|| self.default_output(source), Path::to_path_buf);
        let output_root = create_output(&output).await?;
        if output_root == source_root {
            return Err(TopLevelError::OutputIsSource { path: output_root });
        }

        self.reporter.report(&SortEvent::Started {
            source: source_root.clone(),
            output: output_root.clone(),
        });

        let ctx = Arc::new(RunContext {
            source_root: source_root.clone(),
            output_root,
            options: Arc::clone(&self.options),
            excludes: Arc::clone(&self.excludes),
            reporter: Arc::clone(&self.reporter),
            permits: Semaphore::new(self.options.effective_concurrency()),
            cancel_token: self.cancel_token.clone(),
            tally: Tally::default(),
        });

        walk::walk_dir(Arc::clone(&ctx), source_root).await;

        if ctx.is_cancelled() {
            return Err(TopLevelError::Interrupted);
        }

        Ok(ctx.tally.summary())
    }
}

async fn resolve_source(source: &Path) -> Result<PathBuf, TopLevelError> {
    let metadata = fs::metadata(source).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TopLevelError::SourceNotFound {
                path: source.to_path_buf(),
            }
        } else {
            TopLevelError::SourceUnreadable {
                path: source.to_path_buf(),
                source: Arc::new(e),
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(TopLevelError::SourceNotDirectory {
            path: source.to_path_buf(),
        });
    }

    fs::canonicalize(source)
        .await
        .map_err(|e| TopLevelError::SourceUnreadable {
            path: source.to_path_buf(),
            source: Arc::new(e),
        })
}

async fn create_output(output: &Path) -> Result<PathBuf, TopLevelError> {
    let to_error = |e: std::io::Error| TopLevelError::CreateOutput {
        path: output.to_path_buf(),
        source: Arc::new(e),
    };
    fs::create_dir_all(output).await.map_err(to_error)?;
    fs::canonicalize(output).await.map_err(to_error)
}

/// State shared by every task of one run.
pub(crate) struct RunContext {
    source_root: PathBuf,
    output_root: PathBuf,
    options: Arc<SortOptions>,
    excludes: Arc<[Glob<'static>]>,
    reporter: Arc<dyn Reporter>,
    permits: Semaphore,
    cancel_token: CancellationToken,
    tally: Tally,
}

impl RunContext {
    pub(crate) fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub(crate) fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub(crate) fn options(&self) -> &SortOptions {
        &self.options
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Waits for an I/O slot. Never held across a child fan-in.
    pub(crate) async fn acquire(&self) -> Option<SemaphorePermit<'_>> {
        // The semaphore is never closed
        self.permits.acquire().await.ok()
    }

    /// Whether `path` matches an exclude pattern, relative to the source root.
    pub(crate) fn is_excluded(&self, path: &Path) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        path.strip_prefix(&self.source_root)
            .is_ok_and(|relative| self.excludes.iter().any(|glob| glob.is_match(relative)))
    }

    pub(crate) fn record_outcome(&self, outcome: PlacementOutcome) -> PlacementOutcome {
        self.tally.record(&outcome);
        self.reporter.report(&SortEvent::from_outcome(outcome.clone()));
        outcome
    }

    pub(crate) fn record_scan_error(&self, err: crate::error::ScanError) {
        self.tally.scan_errors.fetch_add(1, Ordering::Relaxed);
        self.reporter.report(&SortEvent::ScanError(err));
    }

    pub(crate) fn record_directory(&self) {
        self.tally.directories_scanned.fetch_add(1, Ordering::Relaxed);
    }
}

/// Atomic run counters.
#[derive(Debug, Default)]
struct Tally {
    directories_scanned: AtomicUsize,
    files_copied: AtomicUsize,
    files_skipped: AtomicUsize,
    files_failed: AtomicUsize,
    scan_errors: AtomicUsize,
    bytes_copied: AtomicU64,
}

impl Tally {
    fn record(&self, outcome: &PlacementOutcome) {
        match outcome.status() {
            PlacementStatus::Copied { bytes, .. } => {
                self.files_copied.fetch_add(1, Ordering::Relaxed);
                self.bytes_copied.fetch_add(*bytes, Ordering::Relaxed);
            }
            PlacementStatus::Skipped { .. } => {
                self.files_skipped.fetch_add(1, Ordering::Relaxed);
            }
            PlacementStatus::Failed(_) => {
                self.files_failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            directories_scanned: self.directories_scanned.load(Ordering::Relaxed),
            files_copied: self.files_copied.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            scan_errors: self.scan_errors.load(Ordering::Relaxed),
            bytes_copied: self.bytes_copied.load(Ordering::Relaxed),
        }
    }
}
