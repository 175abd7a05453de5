// Diagnostic logging
//
// Status for the user goes through the Reporter on stdout; tracing output
// is for diagnosing a run and goes to stderr, quiet unless RUST_LOG asks.

pub const DEFAULT_FILTER: &str = "youtube_muxer=warn";

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
