use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    youtube_muxer::logging::init_tracing();
    youtube_muxer::run().await
}
