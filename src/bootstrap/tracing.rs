//! Tracing configuration for Keepsake
//!
//! Installs the global `tracing-subscriber`: an env-filter for level control,
//! a stderr fmt layer, and an optional rolling file layer when file logging
//! is enabled in the configuration.

use std::{fs, io, path::Path, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub const LOG_FILE_PREFIX: &str = "keepsake.log";

/// Check if running in development environment
fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing.
///
/// Production keeps third-party crates at `warn` so interactive output stays
/// readable; our own crates log at `info`.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let own_level = if is_dev { "debug" } else { "info" };
    vec![
        if is_dev { "debug" } else { "warn" }.to_string(),
        format!("keepsake={own_level}"),
        format!("ks_app={own_level}"),
        format!("ks_infra={own_level}"),
    ]
}

/// Initialize the tracing subscriber.
///
/// `log_dir` enables the daily-rolling file layer. If the file writer cannot
/// be created, logging falls back to stderr only.
///
/// Respects `RUST_LOG` when set.
///
/// # Errors
///
/// Returns `Err` if a subscriber is already registered.
pub fn init_tracing_subscriber(log_dir: Option<&Path>) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    // stderr keeps log lines out of command output
    let stderr_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = log_dir.and_then(|dir| match build_file_writer(dir) {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
    });

    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stderr_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn build_file_writer(log_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}
