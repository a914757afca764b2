// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use super::{ConfigError, ExtsortError, PlacementError, ScanError, ScanStage, TopLevelError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidValue {
        section: "sort".to_string(),
        key: "concurrency".to_string(),
        message: "must be at least 1".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'concurrency' in section '[sort]': must be at least 1"
    );
}

#[test]
fn test_scan_error_display() {
    let err = ScanError::new(
        "/src/locked",
        ScanStage::List,
        io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    );
    insta::assert_snapshot!(err.to_string(), @"failed to list /src/locked: denied");
    assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    assert_eq!(err.stage(), ScanStage::List);
}

#[test]
fn test_placement_error_kind() {
    let err = PlacementError::Copy {
        file: PathBuf::from("/src/a.txt"),
        destination: PathBuf::from("/out/txt/a.txt"),
        source: Arc::new(io::Error::new(io::ErrorKind::NotFound, "gone")),
    };
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    insta::assert_snapshot!(err.to_string(), @"failed to copy /src/a.txt to /out/txt/a.txt: gone");
}

#[test]
fn test_top_level_error_converts() {
    let err: ExtsortError = TopLevelError::SourceNotFound {
        path: PathBuf::from("/missing"),
    }
    .into();
    insta::assert_snapshot!(err.to_string(), @"run failed: source folder not found: /missing");
}

#[test]
fn test_errors_are_clone() {
    let err = ScanError::new("/a", ScanStage::Classify, io::Error::other("boom"));
    let copy = err.clone();
    assert_eq!(err.to_string(), copy.to_string());
}

#[test]
fn test_same_file_error_display() {
    let err = PlacementError::SameFile {
        file: PathBuf::from("/src/o/txt/x.txt"),
        destination: PathBuf::from("/out/txt/x.txt"),
    };
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    insta::assert_snapshot!(
        err.to_string(),
        @"refusing to copy /src/o/txt/x.txt onto itself (/out/txt/x.txt)"
    );
}

#[test]
fn test_config_error_converts() {
    let err: ExtsortError = ConfigError::ParseError {
        message: "unknown field `colour`".to_string(),
    }
    .into();
    insta::assert_snapshot!(err.to_string(), @"config error: failed to parse config: unknown field `colour`");
}

#[test]
fn test_extsort_error_size() {
    // All variants are boxed: discriminant + pointer
    let size = std::mem::size_of::<ExtsortError>();
    assert!(size <= 16, "ExtsortError is {size} bytes, expected <= 16");
}
