// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sorting options.

use clap::Args;

use crate::config::loader::ConfigLoader;
use crate::config::types::CollisionPolicy;
use crate::error::Result;

/// Options mapped onto the `[sort]` configuration section.
#[derive(Debug, Clone, Default, Args)]
pub struct SortArgs {
    /// Maximum number of concurrent directory listings and copies.
    #[arg(short = 'j', long = "jobs", value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// What to do when a file of the same name is already in its folder.
    #[arg(long = "collision", value_name = "POLICY", value_enum)]
    pub collision: Option<CollisionPolicy>,

    /// Folder name for files without an extension.
    #[arg(long = "no-ext-dir", value_name = "NAME")]
    pub no_extension_dir: Option<String>,

    /// Skip entries matching GLOB, relative to the source folder.
    /// Can be specified multiple times.
    #[arg(short = 'x', long = "exclude", value_name = "GLOB", action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Do not follow symbolic links.
    #[arg(long = "no-follow-links")]
    pub no_follow_links: bool,

    /// Do not copy access and modification times.
    #[arg(long = "no-preserve-times")]
    pub no_preserve_times: bool,

    /// Exit with an error if any file or folder could not be processed.
    #[arg(long)]
    pub strict: bool,
}

impl SortArgs {
    /// Applies the options that were given as configuration overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is rejected by the loader.
    pub fn apply_overrides(&self, mut loader: ConfigLoader) -> Result<ConfigLoader> {
        if let Some(jobs) = self.jobs {
            loader = loader.set("sort.concurrency", i64::from(jobs))?;
        }
        if let Some(policy) = self.collision {
            loader = loader.set("sort.collision", policy.to_string())?;
        }
        if let Some(ref name) = self.no_extension_dir {
            loader = loader.set("sort.no_extension_dir", name.clone())?;
        }
        if !self.exclude.is_empty() {
            loader = loader.set("sort.exclude", self.exclude.clone())?;
        }
        if self.no_follow_links {
            loader = loader.set("sort.follow_links", false)?;
        }
        if self.no_preserve_times {
            loader = loader.set("sort.preserve_times", false)?;
        }
        if self.strict {
            loader = loader.set("sort.strict", true)?;
        }
        Ok(loader)
    }
}
