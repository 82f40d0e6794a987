use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sets up logging to stderr so it stays out of the conversation
/// printed on stdout. Filtering is controlled with `RUST_LOG`.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok();
}
