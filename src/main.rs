// extsort-rs: Extension Sorter
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config (files, env, CLI) --> Logging --> Command Dispatch
//!   --print-config | sort
//! ```

use std::process::ExitCode;

use extsort_rs::cli::{self, Cli};
use extsort_rs::cmd::config::{run_loaded_files_command, run_options_command};
use extsort_rs::cmd::sort::{is_reported, run_sort_command};
use extsort_rs::config::Config;
use extsort_rs::config::types::GlobalConfig;
use extsort_rs::logging::LogConfig;
use extsort_rs::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let (config, loaded_files) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if cli.print_config {
        run_loaded_files_command(&loaded_files);
        println!();
        run_options_command(&config);
        return ExitCode::SUCCESS;
    }

    let log_config = build_log_config(&config.global);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    for line in &loaded_files {
        tracing::debug!("config: {line}");
    }
    for line in config.format_options() {
        tracing::debug!("option: {line}");
    }

    dispatch_command(&cli, &config).await
}

fn build_log_config(global: &GlobalConfig) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.as_ref().map(|p| p.display().to_string()))
        .with_file_format(global.log_format)
        .build()
}

async fn dispatch_command(cli: &Cli, config: &Config) -> ExitCode {
    let result = match cli.source.as_deref() {
        Some(source) => run_sort_command(source, cli.output.as_deref(), config)
            .await
            .map(drop),
        None => Err(anyhow::anyhow!("No source folder specified")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !is_reported(&e) {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> extsort_rs::error::Result<(Config, Vec<String>)> {
    let loader = cli.config_loader()?;
    let loaded_files = loader.format_loaded_files();
    let config = loader.build()?;
    Ok((config, loaded_files))
}
