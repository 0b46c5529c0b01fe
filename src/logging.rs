use tracing_subscriber::{EnvFilter, fmt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,fleetcalc=info";

/// Installs the global subscriber. Output goes to stderr so command output on
/// stdout stays machine readable.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
