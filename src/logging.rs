use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Diagnostics go to stderr so the import report on stdout stays readable.
/// Level comes from `RUST_LOG`, default `warn`.
pub fn initialize() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
