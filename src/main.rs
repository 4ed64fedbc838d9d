//! djharness CLI entry point

fn main() {
    // Default to `warn` so log lines stay out of the way of the test programs' own output
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    djharness::cli::run();
}
