//! Logging setup for native builds
//!
//! Web builds initialize `tracing-wasm` from [`crate::web::WebHandle::new`] instead.

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,eframe=warn,wgpu_core=warn,wgpu_hal=warn";

/// Initialize the global `tracing` subscriber.
///
/// Honors `RUST_LOG`; falls back to [`DEFAULT_FILTER`]. With the `profiling` feature,
/// `profiling` scopes are emitted as tracing spans and show up in the same output.
#[cfg(not(target_arch = "wasm32"))]
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        // A subscriber was already installed (tests, embedding apps)
        return;
    }

    tracing::info!(
        "Logging initialized (profiling {})",
        if cfg!(feature = "profiling") {
            "enabled"
        } else {
            "disabled"
        }
    );
}

/// Map a `LOG_LEVEL` value to a tracing level, case-insensitive
pub fn parse_level(level: &str) -> Option<tracing::Level> {
    match level.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(tracing::Level::DEBUG));
        assert_eq!(parse_level("WARN"), Some(tracing::Level::WARN));
        assert_eq!(parse_level("verbose"), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_setup_logging_twice_is_harmless() {
        setup_logging();
        setup_logging();
        tracing::debug!("still logging");
    }
}
