//! Logging setup utilities for the Sketchroom binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the calling crate and the binary are enabled at `default_log_level`.
/// The filter can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "sketchroom-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use sketchroom_shared::logger::setup_logger;
///
/// setup_logger("sketchroom-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Every Sketchroom crate plus the binary itself log at `default_log_level`;
/// dependencies stay at their own defaults.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = [
        "sketchroom_shared",
        "sketchroom_server",
        "sketchroom_client",
    ]
    .iter()
    .map(|krate| format!("{}={}", krate, default_log_level))
    .collect();

    let binary_target = binary_name.replace('-', "_");
    if !directives.iter().any(|d| d.starts_with(&format!("{}=", binary_target))) {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }

    directives.join(",")
}
