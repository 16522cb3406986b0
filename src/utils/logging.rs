//! Tracing subscriber setup for the `ragwire` binary.

use super::toml_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter: `RUST_LOG` wins, then `--verbose`, then the config level.
pub fn env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { config.level.as_str() };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for command output. Calling this twice is a no-op.
pub fn init_tracing(config: &LoggingConfig, verbose: bool, force_json: bool) {
    let filter = env_filter(config, verbose);
    let json = force_json || config.format == LogFormat::Json;

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Tracing already initialised: {}", e);
    }
}
