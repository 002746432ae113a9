//! Structured logging setup
//!
//! Logs go to stderr so command output on stdout stays clean.

use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Environment variable read for the log filter when `--log-level` is absent
pub const LOG_ENV: &str = "ARUS_LOG";

const FALLBACK_LEVEL: &str = "warn";

/// Pick the log filter: explicit level first, then settings
///
/// The CLI maps both `--log-level` and `ARUS_LOG` onto `explicit`.
pub fn resolve_level(explicit: Option<&str>, settings: &Settings) -> String {
    explicit
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(settings.log_level.as_str())
        .to_string()
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Install the global tracing subscriber
///
/// A subscriber that is already installed wins; the error from a second
/// call is ignored.
pub fn init_logging(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
