// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! File placer.
//!
//! ```text
//! place(file)
//!   dir = output / lowercase(ext)      (no ext -> no_extension_dir)
//!   create_dir_all(dir)                idempotent, race tolerant
//!   destination by collision policy
//!     overwrite  dir/name, unless it is the source file itself
//!     skip       create_new(dir/name) or Skipped
//!     rename     create_new(dir/name), dir/"stem (1).ext", ...
//!   tokio::fs::copy, then atime/mtime via filetime
//! ```

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filetime::FileTime;
use tokio::fs;

use super::report::{PlacementOutcome, PlacementStatus};
use super::{RunContext, SortOptions};
use crate::config::types::CollisionPolicy;
use crate::error::PlacementError;

/// Upper bound on `stem (N).ext` candidates tried by the rename policy.
const MAX_RENAME_ATTEMPTS: u32 = 10_000;

/// Name of the folder `file` belongs in.
///
/// The extension is lowercased when it is valid UTF-8 and kept byte for byte
/// otherwise. Files without one (`Makefile`, `.bashrc`, `trailing.`) go to
/// `no_extension_dir`.
#[must_use]
pub fn extension_folder_name(file: &Path, no_extension_dir: &str) -> OsString {
    match file.extension() {
        Some(ext) if !ext.is_empty() => ext
            .to_str()
            .map_or_else(|| ext.to_os_string(), |ext| OsString::from(ext.to_lowercase())),
        _ => OsString::from(no_extension_dir),
    }
}

/// Folder under `output_root` that `file` is copied into.
#[must_use]
pub fn destination_dir(file: &Path, output_root: &Path, no_extension_dir: &str) -> PathBuf {
    output_root.join(extension_folder_name(file, no_extension_dir))
}

/// Places one file, tallying and reporting the outcome.
pub(crate) async fn place(ctx: &RunContext, file: &Path) -> PlacementOutcome {
    let outcome = {
        let _permit = ctx.acquire().await;
        place_file(file, ctx.output_root(), ctx.options()).await
    };
    ctx.record_outcome(outcome)
}

/// Copies `file` into its extension folder under `output_root`.
///
/// Never fails: errors are carried in the returned outcome.
pub async fn place_file(file: &Path, output_root: &Path, options: &SortOptions) -> PlacementOutcome {
    let dir = destination_dir(file, output_root, options.no_extension_dir());
    let status = match copy_into(file, &dir, options).await {
        Ok(status) => status,
        Err(err) => PlacementStatus::Failed(err),
    };
    PlacementOutcome::new(file.to_path_buf(), dir, status)
}

async fn copy_into(
    file: &Path,
    dir: &Path,
    options: &SortOptions,
) -> Result<PlacementStatus, PlacementError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| PlacementError::CreateDir {
            dir: dir.to_path_buf(),
            source: Arc::new(e),
        })?;

    let Some(name) = file.file_name() else {
        return Err(PlacementError::Copy {
            file: file.to_path_buf(),
            destination: dir.to_path_buf(),
            source: Arc::new(io::Error::new(
                io::ErrorKind::InvalidInput,
                "source path has no file name",
            )),
        });
    };

    let (destination, reserved) = match options.collision() {
        CollisionPolicy::Overwrite => {
            let destination = dir.join(name);
            if is_same_file(file, &destination).await {
                return Err(PlacementError::SameFile {
                    file: file.to_path_buf(),
                    destination,
                });
            }
            (destination, false)
        }
        CollisionPolicy::Skip => {
            let destination = dir.join(name);
            match reserve(&destination).await {
                Ok(()) => (destination, true),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    return Ok(PlacementStatus::Skipped { destination });
                }
                Err(e) => {
                    return Err(PlacementError::Reserve {
                        destination,
                        source: Arc::new(e),
                    });
                }
            }
        }
        CollisionPolicy::Rename => (reserve_free_name(dir, name).await?, true),
    };

    let bytes = match fs::copy(file, &destination).await {
        Ok(bytes) => bytes,
        Err(e) => {
            if reserved {
                // Do not leave an empty placeholder behind
                let _ = fs::remove_file(&destination).await;
            }
            return Err(PlacementError::Copy {
                file: file.to_path_buf(),
                destination,
                source: Arc::new(e),
            });
        }
    };

    if options.preserve_times()
        && let Err(e) = copy_times(file, &destination).await
    {
        tracing::warn!(
            file = %file.display(),
            error = %e,
            "Failed to copy file times"
        );
    }

    Ok(PlacementStatus::Copied { destination, bytes })
}

/// Whether `destination` already is `file`, e.g. reached through a link.
///
/// Copying a file onto itself truncates it.
async fn is_same_file(file: &Path, destination: &Path) -> bool {
    let (Ok(source), Ok(target)) = (fs::metadata(file).await, fs::metadata(destination).await)
    else {
        return false;
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        source.dev() == target.dev() && source.ino() == target.ino()
    }

    #[cfg(not(unix))]
    {
        let _ = (source, target);
        matches!(
            (fs::canonicalize(file).await, fs::canonicalize(destination).await),
            (Ok(a), Ok(b)) if a == b
        )
    }
}

/// Atomically claims `path` by creating it empty.
async fn reserve(path: &Path) -> io::Result<()> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map(drop)
}

/// Claims the first free name among `name`, `stem (1).ext`, `stem (2).ext`, ...
async fn reserve_free_name(dir: &Path, name: &std::ffi::OsStr) -> Result<PathBuf, PlacementError> {
    let name_path = Path::new(name);
    let stem = name_path.file_stem().unwrap_or(name);
    let extension = name_path.extension();

    let mut last_error = None;
    for attempt in 0..MAX_RENAME_ATTEMPTS {
        let candidate = if attempt == 0 {
            dir.join(name)
        } else {
            let mut numbered = OsString::from(stem);
            numbered.push(format!(" ({attempt})"));
            if let Some(ext) = extension {
                numbered.push(".");
                numbered.push(ext);
            }
            dir.join(numbered)
        };

        match reserve(&candidate).await {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last_error = Some(e),
            Err(e) => {
                return Err(PlacementError::Reserve {
                    destination: candidate,
                    source: Arc::new(e),
                });
            }
        }
    }

    Err(PlacementError::Reserve {
        destination: dir.join(name),
        source: Arc::new(last_error.unwrap_or_else(|| {
            io::Error::new(io::ErrorKind::AlreadyExists, "no free destination name")
        })),
    })
}

/// Copies access and modification times from `source` onto `destination`.
async fn copy_times(source: &Path, destination: &Path) -> io::Result<()> {
    let source = source.to_path_buf();
    let destination = destination.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let metadata = std::fs::metadata(&source)?;
        filetime::set_file_times(
            &destination,
            FileTime::from_last_access_time(&metadata),
            FileTime::from_last_modification_time(&metadata),
        )
    })
    .await
    .map_err(io::Error::other)?
}
