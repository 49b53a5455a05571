use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`
/// (default `info`). Rocket's `log` records are forwarded to it as well.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
    {
        eprintln!("logging already initialized: {err}");
    }
}
