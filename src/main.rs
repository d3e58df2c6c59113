use std::io;

#[cfg(feature = "logging")]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(not(feature = "logging"))]
fn init_logging() {}

fn main() -> io::Result<()> {
    init_logging();
    neurocode::cli::run()
}
