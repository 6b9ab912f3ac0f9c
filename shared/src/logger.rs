//! Logging utilities

use tracing::{debug, info};

/// Initialize the logger.
///
/// JSON lines on stdout, filtered by `RUST_LOG` with `info` as the floor.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logger() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init();
}

/// Log a finished product calculation
pub fn log_calculation(asin: Option<&str>, category: &str, selling_price: &str, net_earnings: &str) {
    info!(
        asin = asin.unwrap_or("-"),
        category = %category,
        selling_price = %selling_price,
        net_earnings = %net_earnings,
        "Product fees calculated"
    );
}

/// Log a rate lookup that fell back to its default
pub fn log_default_rate(kind: &'static str, category: &str, default: &str) {
    debug!(
        kind,
        category = %category,
        default = %default,
        "No configured rate, using default"
    );
}
