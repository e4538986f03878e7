//! Logging setup for the `taskrank` binary.
//!
//! Console only, on stderr, so `--json` output on stdout stays clean.
//! `RUST_LOG` overrides the level chosen from `--verbose`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    pub verbose: bool,
    pub json: bool,
}

pub fn init_logging(opts: LogOptions) {
    let default_level = if opts.verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = ["taskrank", "taskrank_core", "taskrank_ingest"]
            .map(|target| format!("{target}={default_level}"))
            .join(",");
        EnvFilter::new(format!("{directives},tower_http=info"))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if opts.json {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(true),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(opts.verbose)
                    .with_file(opts.verbose)
                    .with_line_number(opts.verbose)
                    .compact(),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("logging already initialized: {e}");
    }

    tracing::debug!(verbose = opts.verbose, json = opts.json, "logging initialized");
}

/// Console-only logging for tests.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
