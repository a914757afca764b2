// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recursive tree walker.
//!
//! ```text
//! walk_dir(dir)
//!   permit ─> read_dir ─> classify each entry (metadata at traversal time)
//!   drop permit
//!   JoinSet
//!     ├── walk_dir(subdir)     recursive, same output root
//!     └── place(file)
//!   join all  (fan-in: dir completes after every descendant)
//! ```
//!
//! Skipped silently: entries that vanished between listing and
//! classification, special files, dangling or looping symlinks, excluded
//! paths, and any directory that resolves into the output root.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::fs;
use tokio::task::JoinSet;

use super::RunContext;
use super::place;
use crate::error::{ScanError, ScanStage};

/// Kind of a directory entry worth visiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// Classifies `path` by querying the filesystem now.
///
/// Returns `Ok(None)` for anything that is neither a directory nor a regular
/// file. With `follow_links`, a symlink is classified by its target; a link
/// whose target cannot be resolved (missing, looping) is `Ok(None)` too.
///
/// # Errors
///
/// Returns the metadata error; `NotFound` means the entry vanished.
pub async fn classify(path: &Path, follow_links: bool) -> io::Result<Option<EntryKind>> {
    let metadata = if follow_links {
        match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                return if is_symlink(path).await {
                    tracing::debug!(path = %path.display(), error = %e, "Unresolvable symlink");
                    Ok(None)
                } else {
                    Err(e)
                };
            }
        }
    } else {
        fs::symlink_metadata(path).await?
    };

    Ok(if metadata.is_dir() {
        Some(EntryKind::Directory)
    } else if metadata.is_file() {
        Some(EntryKind::File)
    } else {
        None
    })
}

async fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .await
        .is_ok_and(|metadata| metadata.file_type().is_symlink())
}

/// Whether walking `dir` would descend into the output tree.
///
/// With `follow_links` the entry may reach the output root through a link, so
/// it is compared by canonical path. An output root above the source only
/// matches exactly.
async fn leads_into_output(ctx: &RunContext, dir: &Path) -> bool {
    let output_root = ctx.output_root();
    let inside = |path: &Path| {
        path == output_root
            || (path.starts_with(output_root) && !ctx.source_root().starts_with(output_root))
    };
    if inside(dir) {
        return true;
    }
    if !ctx.options().follow_links() {
        return false;
    }
    fs::canonicalize(dir).await.is_ok_and(|resolved| inside(&resolved))
}

struct Entry {
    path: PathBuf,
    kind: EntryKind,
}

/// Walks `dir`, placing every file and recursing into every subdirectory.
///
/// Never fails: a directory that cannot be scanned is reported as a
/// [`ScanError`] and its subtree is abandoned.
pub(crate) fn walk_dir(ctx: Arc<RunContext>, dir: PathBuf) -> BoxFuture<'static, ()> {
    Box::pin(async move {
        if ctx.is_cancelled() {
            return;
        }

        let entries = match scan_dir(&ctx, &dir).await {
            Ok(entries) => entries,
            Err(err) => {
                ctx.record_scan_error(err);
                return;
            }
        };
        ctx.record_directory();

        let mut set = JoinSet::new();
        for Entry { path, kind } in entries {
            if ctx.is_cancelled() {
                break;
            }
            match kind {
                EntryKind::Directory => {
                    set.spawn(walk_dir(Arc::clone(&ctx), path));
                }
                EntryKind::File => {
                    let ctx = Arc::clone(&ctx);
                    set.spawn(async move {
                        place::place(&ctx, &path).await;
                    });
                }
            }
        }

        while let Some(result) = set.join_next().await {
            if let Err(e) = result {
                tracing::error!(dir = %dir.display(), error = %e, "Walker task panicked");
            }
        }
    })
}

/// Lists and classifies the entries of one directory.
async fn scan_dir(ctx: &RunContext, dir: &Path) -> Result<Vec<Entry>, ScanError> {
    let _permit = ctx.acquire().await;

    let mut read_dir = fs::read_dir(dir)
        .await
        .map_err(|e| ScanError::new(dir, ScanStage::List, e))?;

    let mut entries = Vec::new();
    while let Some(dir_entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| ScanError::new(dir, ScanStage::ReadEntry, e))?
    {
        let path = dir_entry.path();

        if ctx.is_excluded(&path) {
            tracing::debug!(path = %path.display(), "Skipping excluded entry");
            continue;
        }

        match classify(&path, ctx.options().follow_links()).await {
            Ok(Some(kind)) => {
                if kind == EntryKind::Directory && leads_into_output(ctx, &path).await {
                    tracing::debug!(path = %path.display(), "Skipping output folder");
                    continue;
                }
                entries.push(Entry { path, kind });
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "Skipping special entry");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Skipping vanished entry");
            }
            Err(e) => return Err(ScanError::new(dir, ScanStage::Classify, e)),
        }
    }

    Ok(entries)
}
