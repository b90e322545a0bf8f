use anyhow::Result;

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` when `verbose`.
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
