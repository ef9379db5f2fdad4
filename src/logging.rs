//! Tracing subscriber setup for the binary

use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when neither `PHOTAG_LOG` nor the config names one
pub const DEFAULT_FILTER: &str = "photag=info,warn";

/// Output shape of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    /// Parse `PHOTAG_LOG_FORMAT`; anything but `json` is compact
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Install the global subscriber, logging to stderr
///
/// `PHOTAG_LOG` wins over `config_level`, which wins over [`DEFAULT_FILTER`].
/// Calling this twice leaves the first subscriber in place.
pub fn init_tracing(config_level: Option<&str>) {
    let filter = EnvFilter::try_from_env("PHOTAG_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config_level.unwrap_or(DEFAULT_FILTER)));

    let format = LogFormat::parse(env::var("PHOTAG_LOG_FORMAT").ok().as_deref());
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing already initialised");
    }
}
