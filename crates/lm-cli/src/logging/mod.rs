//! Diagnostics for the CLI.
//!
//! stdout carries sanitized payloads only. Every diagnostic goes to stderr,
//! either as human-readable lines or as one JSON object per event.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events are shown; everything else stays silent.
const LOG_TARGETS: &[&str] = &["lm_sanitize", "lm_cli", "logmask"];

/// `EnvFilter` directives applying `level` to this workspace's crates.
pub fn filter_directives(level: LogLevel) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(config: &LogConfig) {
    let (human, jsonl) = match config.format {
        LogFormat::Human => (
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal()),
            ),
            None,
        ),
        LogFormat::Jsonl => (
            None,
            Some(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            ),
        ),
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter_directives(config.level)))
        .with(human)
        .with(jsonl)
        .try_init();
}
