//! Tracing subscriber setup.

use crate::config::LoggingSettings;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Noisy dependencies held at `warn` unless the directive names them.
const QUIET_TARGETS: &str = "hyper=warn,hyper_util=warn,reqwest=warn,h2=warn";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured level. A bare level such as `debug`
/// also quiets the HTTP stack; a full directive string is used as given.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = settings.level.trim();
        let spec = if level.contains(',') || level.contains('=') {
            level.to_string()
        } else {
            format!("{level},{QUIET_TARGETS}")
        };
        EnvFilter::try_new(spec).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if settings.json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(false))
            .try_init()
    } else {
        registry.with(fmt::layer().compact().with_target(true)).try_init()
    };

    if installed.is_ok() {
        tracing::debug!(json = settings.json, level = %settings.level, "tracing initialized");
    }
}
