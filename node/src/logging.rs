//! # Structured Logging
//!
//! Installs the global `tracing` subscriber for the node. The output format
//! comes from `--log-format` / `LEDGER_LOG_FORMAT`; the level filter comes
//! from `RUST_LOG` and falls back to the node's default directives.
//!
//! All log output is written to stderr so that stdout carries only the JSON
//! results of each subcommand.

use clap::ValueEnum;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directives when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVES: &str = "ledger_node=info,ledger_contracts=info";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines with target and source line.
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Builds the level filter: `RUST_LOG` when it parses, `default` otherwise.
fn level_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn try_init_logging(format: LogFormat) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(level_filter(DEFAULT_DIRECTIVES));
    match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false)
                    .with_target(true),
            )
            .try_init()?,
    }

    tracing::debug!(?format, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!(LogFormat::from_str("json", true), Ok(LogFormat::Json));
        assert_eq!(LogFormat::from_str("Pretty", true), Ok(LogFormat::Pretty));
        assert!(LogFormat::from_str("xml", true).is_err());
    }

    #[test]
    fn default_directives_parse() {
        assert!(DEFAULT_DIRECTIVES.parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn second_install_is_an_error() {
        // Other tests in this binary may have installed one already; either
        // way the second call must fail rather than panic.
        let _ = try_init_logging(LogFormat::Json);
        assert!(try_init_logging(LogFormat::Pretty).is_err());
    }
}
