// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sort command implementation for extsort-rs.

use std::path::Path;
use std::sync::Arc;

use anyhow::bail;

use crate::config::Config;
use crate::error::{ExtsortError, Result};
use crate::sort::report::{Reporter, RunSummary, TracingReporter};
use crate::sort::{SortOptions, Sorter};

/// Main handler for the sort command.
///
/// Events are rendered through `tracing`. Ctrl+C cancels the run.
///
/// # Errors
///
/// Returns an error if the exclude patterns are invalid, the run fails as a
/// whole, or `sort.strict` is set and any file or folder failed.
pub async fn run_sort_command(
    source: &Path,
    output: Option<&Path>,
    config: &Config,
) -> Result<RunSummary> {
    run_sort_with_reporter(source, output, config, Arc::new(TracingReporter)).await
}

/// Like [`run_sort_command`], reporting events to `reporter`.
///
/// # Errors
///
/// See [`run_sort_command`].
pub async fn run_sort_with_reporter(
    source: &Path,
    output: Option<&Path>,
    config: &Config,
    reporter: Arc<dyn Reporter>,
) -> Result<RunSummary> {
    let options = SortOptions::from_config(&config.sort);
    let sorter = Sorter::new(options, reporter).map_err(ExtsortError::from)?;

    let cancel_token = sorter.cancel_token();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting sort...");
            cancel_token.cancel();
        }
    });

    let result = sorter.run(source, output).await;
    signal_task.abort();

    let summary = result.map_err(ExtsortError::from)?;
    check_strict(&summary, config.sort.strict)?;
    Ok(summary)
}

/// Fails if `strict` is set and the run recorded any failure.
///
/// # Errors
///
/// Returns an error naming the failure tallies.
pub fn check_strict(summary: &RunSummary, strict: bool) -> Result<()> {
    if strict && !summary.is_clean() {
        bail!(
            "{} file(s) and {} folder(s) could not be sorted (strict mode)",
            summary.files_failed,
            summary.scan_errors
        );
    }
    Ok(())
}

/// Whether `err` was already logged as a `RunError` event by the reporter.
#[must_use]
pub fn is_reported(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<ExtsortError>(), Some(ExtsortError::TopLevel(_)))
}
