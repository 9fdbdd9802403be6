//! Tracing setup for the `enumr` binary
//!
//! Output goes to stderr so it never mixes with `--dry-run` source on stdout.
//!
//! ```bash
//! ENUMR_LOG=debug enumr --type Status
//! ENUMR_LOG=debug ENUMR_LOG_FORMAT=json enumr --type Status
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Filter applied when neither `ENUMR_LOG` nor `RUST_LOG` is set
pub const DEFAULT_FILTER: &str = "warn";

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default)
    Text,
    /// Newline-delimited JSON objects
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read from `ENUMR_LOG_FORMAT`
    fn from_env() -> Self {
        Self::parse(&std::env::var("ENUMR_LOG_FORMAT").unwrap_or_default())
    }
}

/// `ENUMR_LOG`, else `RUST_LOG`, else [`DEFAULT_FILTER`]
fn build_filter() -> EnvFilter {
    let directives = std::env::var("ENUMR_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    EnvFilter::builder().parse_lossy(directives)
}

/// Initialise the global tracing subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = build_filter();

    let result = match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
