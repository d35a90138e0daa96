//! Structured logging setup.
//!
//! The crate logs through `tracing` macros with named fields. Applications that do not
//! install their own subscriber can call [`init`] once at startup:
//!
//! ```no_run
//! use typedroute::config::Config;
//!
//! let config = Config::from_env();
//! typedroute::telemetry::init(&config.logging).expect("Failed to initialize logging");
//! ```

use crate::config::{LogFormat, LoggingConfig};
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INSTALLED: OnceCell<LogFormat> = OnceCell::new();

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Calling this again after a
/// successful install is a no-op.
pub fn init(config: &LoggingConfig) -> Result<()> {
    INSTALLED
        .get_or_try_init(|| install(config).map(|()| config.format))
        .map(|_| ())
}

fn install(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("invalid log level '{}'", config.level))?;

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_span_list(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Json,
        };
        // Another test binary may already own the global subscriber; only repeat calls matter.
        if init(&config).is_ok() {
            assert!(init(&config).is_ok());
        }
    }
}
