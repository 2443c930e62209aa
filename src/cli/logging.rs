//! Tracing subscriber setup for the binary.
//!
//! Output format is controlled by `STUB_EXTRACTOR_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `json`: one JSON object per event
//!
//! ```bash
//! STUB_EXTRACTOR_LOG=debug stub-extractor src/
//! STUB_EXTRACTOR_LOG="stub_extractor::walk=trace" STUB_EXTRACTOR_LOG_FORMAT=json stub-extractor pkg/
//! ```
//!
//! The subscriber is only installed when `STUB_EXTRACTOR_LOG` (or `RUST_LOG`)
//! is set, or when `--verbose` is passed.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "STUB_EXTRACTOR_LOG";
const FORMAT_VAR: &str = "STUB_EXTRACTOR_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(FORMAT_VAR).unwrap_or_default())
    }
}

/// The filter directives to use, if any: `STUB_EXTRACTOR_LOG` first, then
/// `RUST_LOG`, then `debug` when verbose.
pub fn filter_directives(own: Option<String>, rust_log: Option<String>, verbose: bool) -> Option<String> {
    own.or(rust_log).or_else(|| verbose.then(|| "debug".to_string()))
}

/// Install the global subscriber. All output goes to stderr so stub text on
/// stdout stays clean.
pub fn init_logging(verbose: bool) {
    let Some(directives) = filter_directives(
        std::env::var(LOG_VAR).ok(),
        std::env::var("RUST_LOG").ok(),
        verbose,
    ) else {
        return;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
