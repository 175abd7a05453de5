pub mod downloader;
pub mod logging;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use console::{style, Term};
use tracing::{debug, error};

use downloader::{
    Config, Muxer, ProviderError, Reporter, RunError, RunOrchestrator, RunSummary, ToolManager, ToolType,
    YtDlpProvider,
};

const PROMPT: &str = "Enter the URL of the YouTube video: ";

/// Interactive entry point: ask for one URL, run it, report the outcome
pub async fn run() -> ExitCode {
    let reporter = Reporter::new();
    reporter.banner("Youtube Video Downloader");

    let url = match tokio::task::spawn_blocking(prompt_url).await {
        Ok(Ok(url)) => url,
        Ok(Err(e)) => {
            error!(error = %e, "failed to read URL");
            String::new()
        }
        Err(e) => {
            error!(error = %e, "prompt task failed");
            String::new()
        }
    };

    let config = Config::from_env();
    debug!(?config, "configuration");

    let result = run_once(&config, &url, &reporter).await;
    ExitCode::from(report_outcome(&result, &reporter))
}

/// Print the final outcome; returns the process exit status
fn report_outcome(result: &Result<RunSummary, RunError>, reporter: &Reporter) -> u8 {
    match result {
        Ok(summary) => {
            reporter.success(&format!("Saved to {}", summary.output.display()));
            reporter.banner(&format!("Download Completed: {}", summary.title));
            0
        }
        Err(e) => {
            reporter.error(e);
            1
        }
    }
}

async fn run_once(
    config: &Config,
    url: &str,
    reporter: &Reporter,
) -> Result<RunSummary, RunError> {
    // Tool discovery may spawn `which`; a blank URL must fail before that
    if url.trim().is_empty() {
        return Err(RunError::InvalidInput);
    }

    let (ytdlp, ffmpeg) = tokio::task::spawn_blocking({
        let config = config.clone();
        move || discover_tools(&config)
    })
    .await
    .map_err(|e| RunError::InfoRetrievalFailed(ProviderError::ExecutionError(e.to_string())))?;

    let provider = YtDlpProvider::new(ytdlp, config.network.clone(), config.info_timeout_secs)
        .map_err(RunError::InfoRetrievalFailed)?;

    let orchestrator = RunOrchestrator::new(
        Arc::new(provider),
        Muxer::new(ffmpeg),
        config.download_root.clone(),
    );
    orchestrator.run(url, reporter).await
}

/// yt-dlp and ffmpeg binaries; runs `which`/`where`, so keep it off the runtime
fn discover_tools(config: &Config) -> (PathBuf, PathBuf) {
    let tools = ToolManager::new();
    let ytdlp = tools.find_binary(ToolType::YtDlp, config.ytdlp_path.as_deref());
    let ffmpeg = tools.find_binary(ToolType::Ffmpeg, config.ffmpeg_path.as_deref());

    if tracing::enabled!(tracing::Level::DEBUG) {
        for (tool, configured) in [
            (ToolType::YtDlp, &config.ytdlp_path),
            (ToolType::Ffmpeg, &config.ffmpeg_path),
        ] {
            let info = tools.get_tool_info(tool, configured.as_deref());
            debug!(tool = %info.name, available = info.is_available, version = ?info.version, path = ?info.path, "tool");
        }
    }

    (ytdlp, ffmpeg)
}

fn prompt_url() -> io::Result<String> {
    let term = Term::stdout();
    if term.features().is_attended() {
        term.write_str(&style(PROMPT).bold().to_string())?;
        return term.read_line();
    }

    // Piped input
    print!("{}", PROMPT);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
