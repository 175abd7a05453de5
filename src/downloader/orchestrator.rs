// Run orchestrator: one URL in, one mp4 out
//
// Start -> Inspect -> ResolvePaths -> Clean -> Fetch -> Mux -> Done
//
// Every failure is terminal for the run; nothing is retried. This is the
// only place that deletes the output or the temp files.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::cleanup::{remove_stale_files, remove_temp_files};
use super::errors::RunError;
use super::fetcher::{StreamFetcher, PROGRESS_CHANNEL_CAPACITY};
use super::format_selector::FormatSelector;
use super::models::RunSummary;
use super::muxer::Muxer;
use super::paths::RunContext;
use super::reporter::Reporter;
use super::sanitize::sanitize_title;
use super::traits::StreamProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Inspect,
    ResolvePaths,
    Clean,
    Fetch,
    Mux,
    Done,
}

pub struct RunOrchestrator {
    provider: Arc<dyn StreamProvider>,
    muxer: Muxer,
    download_root: PathBuf,
}

impl RunOrchestrator {
    pub fn new(provider: Arc<dyn StreamProvider>, muxer: Muxer, download_root: PathBuf) -> Self {
        Self {
            provider,
            muxer,
            download_root,
        }
    }

    pub async fn run(&self, url: &str, reporter: &Reporter) -> Result<RunSummary, RunError> {
        let mut stage = Stage::Start;
        let result = self.run_stages(url, reporter, &mut stage).await;

        match &result {
            Ok(summary) => info!(output = %summary.output.display(), "run finished"),
            Err(e) => warn!(?stage, error = %e, "run aborted"),
        }
        result
    }

    async fn run_stages(
        &self,
        url: &str,
        reporter: &Reporter,
        stage: &mut Stage,
    ) -> Result<RunSummary, RunError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(RunError::InvalidInput);
        }

        enter(stage, Stage::Inspect);
        reporter.step("Getting video information...");
        let video = self
            .provider
            .resolve(url)
            .await
            .map_err(RunError::InfoRetrievalFailed)?;
        reporter.success("Video information retrieved");
        let selected = FormatSelector::select(&video)?;
        debug!(
            video = %selected.video.format_id,
            audio = %selected.audio.format_id,
            "selected encodings"
        );

        enter(stage, Stage::ResolvePaths);
        let stem = sanitize_title(&video.title);
        if stem.is_empty() {
            return Err(RunError::EmptyTitle {
                title: video.title.clone(),
            });
        }
        let ctx = RunContext::resolve(&self.download_root, &stem, &selected.video.ext, &selected.audio.ext)?;

        enter(stage, Stage::Clean);
        let removed = remove_stale_files(&ctx)?;
        if removed.contains(&ctx.output) {
            reporter.warn("Output file found: deleted it and re-downloading");
        }

        enter(stage, Stage::Fetch);
        reporter.step("Starting download...");
        let fetcher = StreamFetcher::new(Arc::clone(&self.provider));
        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let (fetched, ()) = tokio::join!(
            fetcher.fetch(&selected, &ctx, tx),
            reporter.track_transfers(rx, &video.title)
        );
        let outcome = fetched?;
        reporter.success("Download completed successfully!");

        enter(stage, Stage::Mux);
        reporter.step("Merging audio and video...");
        self.muxer
            .mux(&ctx.video_temp, &ctx.audio_temp, &ctx.output)
            .await?;
        remove_temp_files(&ctx);
        reporter.success("Merge completed successfully!");

        enter(stage, Stage::Done);
        Ok(RunSummary {
            title: video.title,
            output: ctx.output,
            video_bytes: outcome.video_bytes,
            audio_bytes: outcome.audio_bytes,
        })
    }
}

fn enter(stage: &mut Stage, next: Stage) {
    debug!(from = ?*stage, to = ?next, "stage");
    *stage = next;
}
