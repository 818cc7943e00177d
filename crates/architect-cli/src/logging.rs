use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Log to stderr so replies on stdout stay clean. `RUST_LOG` overrides the
/// default `warn` level.
pub fn configure_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_log = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let subscriber = Registry::default().with(filter).with(stderr_log);
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {e}");
    }
}
