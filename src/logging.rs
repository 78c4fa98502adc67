use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the process subscriber. `RUST_LOG` wins over `default_level`.
///
/// Output goes to stderr so stdout stays free for command output.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
