//! Logging setup.
//!
//! `RUST_LOG` wins over the configured level when present. JSON lines are
//! emitted instead of the human format when `log_json` is set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let (plain, json) = if config.log_json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(plain)
        .with(json)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logging initialised at level {}", config.log_level);
    }
}
