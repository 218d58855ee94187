use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Output is JSON on stderr so stdout stays free for command output.
/// `RUST_LOG` takes precedence; otherwise quiet mode logs warnings and
/// above, verbose mode logs info and above. Calling this twice is a no-op.
pub fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
