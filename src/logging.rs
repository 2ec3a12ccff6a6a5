use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "historyview=warn";

/// Installs the global subscriber. Events go to stderr so the stdout report
/// is unaffected; `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
