use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sets the logging (tracing) level using RUST_LOG, falling back to the supplied default log settings.
///
/// Log lines go to stderr so stdout only carries the confirmation message.
pub fn setup_logging(default_log_settings: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_settings.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Default filter for the binary: quiet third-party crates, surface our own progress.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,react_route_sitemap=debug"
    } else {
        "warn,react_route_sitemap=info"
    }
}
