/// Structured logging setup for the vegetation health service.
///
/// Installs a `tracing-subscriber` formatter. `RUST_LOG` wins when set;
/// otherwise the configured level applies to this crate only.

use tracing_subscriber::EnvFilter;

/// Builds the filter used by `init`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vhi_service={}", level)))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .try_init();
}
