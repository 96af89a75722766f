use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Defaults to `warn`; override with `RUST_LOG`. Logs go to stderr so they
/// never interleave with the progress report on stdout.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
