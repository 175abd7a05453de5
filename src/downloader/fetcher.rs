// Concurrent download of the selected video and audio encodings
//
// Both transfers run as spawned tasks and are always awaited to the end,
// even when one fails early, so the temp files left behind are the same
// whatever the interleaving. Progress is published on a bounded channel;
// the receiver sees, per stream, non-decreasing byte counts ending in a
// Completed or Failed snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use super::errors::{ProviderError, RunError};
use super::format_selector::SelectedEncodings;
use super::models::{Encoding, StreamRole, TransferProgress, TransferState};
use super::paths::RunContext;
use super::traits::StreamProvider;

/// Minimum bytes between two progress events of one stream
const PROGRESS_STEP: u64 = 256 * 1024;

/// Capacity of the progress channel created by callers
pub const PROGRESS_CHANNEL_CAPACITY: usize = 64;

/// Bytes written per stream after a successful fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOutcome {
    pub video_bytes: u64,
    pub audio_bytes: u64,
}

pub struct StreamFetcher {
    provider: Arc<dyn StreamProvider>,
}

impl StreamFetcher {
    pub fn new(provider: Arc<dyn StreamProvider>) -> Self {
        Self { provider }
    }

    /// Download both encodings into the run's temp files.
    ///
    /// Succeeds only when both transfers complete. If both fail the video
    /// failure is reported.
    pub async fn fetch(
        &self,
        selected: &SelectedEncodings,
        ctx: &RunContext,
        progress: mpsc::Sender<TransferProgress>,
    ) -> Result<FetchOutcome, RunError> {
        info!(
            provider = self.provider.name(),
            video = %selected.video.format_id,
            audio = %selected.audio.format_id,
            "starting transfers"
        );

        let video_task = tokio::spawn(fetch_one(
            Arc::clone(&self.provider),
            StreamRole::Video,
            selected.video.clone(),
            ctx.video_temp.clone(),
            progress.clone(),
        ));
        let audio_task = tokio::spawn(fetch_one(
            Arc::clone(&self.provider),
            StreamRole::Audio,
            selected.audio.clone(),
            ctx.audio_temp.clone(),
            progress,
        ));

        let (video_result, audio_result) = tokio::join!(video_task, audio_task);

        let video_bytes = settle(StreamRole::Video, video_result);
        let audio_bytes = settle(StreamRole::Audio, audio_result);

        Ok(FetchOutcome {
            video_bytes: video_bytes?,
            audio_bytes: audio_bytes?,
        })
    }
}

fn settle(
    role: StreamRole,
    joined: Result<Result<u64, ProviderError>, JoinError>,
) -> Result<u64, RunError> {
    let reason = match joined {
        Ok(Ok(bytes)) => return Ok(bytes),
        Ok(Err(e)) => e.to_string(),
        Err(e) => format!("transfer task aborted: {}", e),
    };

    warn!(stream = %role, %reason, "transfer failed");
    Err(RunError::TransferFailed { role, reason })
}

async fn fetch_one(
    provider: Arc<dyn StreamProvider>,
    role: StreamRole,
    encoding: Encoding,
    path: PathBuf,
    progress: mpsc::Sender<TransferProgress>,
) -> Result<u64, ProviderError> {
    let mut state = TransferState::new(role, encoding.byte_length);

    match transfer(provider.as_ref(), &encoding, &path, &mut state, &progress).await {
        Ok(()) => {
            state.complete();
            let _ = progress.send(state.snapshot()).await;
            debug!(stream = %role, bytes = state.downloaded(), "transfer complete");
            Ok(state.downloaded())
        }
        Err(e) => {
            state.fail();
            let _ = progress.send(state.snapshot()).await;
            Err(e)
        }
    }
}

async fn transfer(
    provider: &dyn StreamProvider,
    encoding: &Encoding,
    path: &Path,
    state: &mut TransferState,
    progress: &mpsc::Sender<TransferProgress>,
) -> Result<(), ProviderError> {
    let mut stream = provider.open_stream(encoding).await?;

    if stream.content_length.is_some() {
        state.set_total(stream.content_length);
    }
    let _ = progress.send(state.snapshot()).await;

    let mut file = tokio::fs::File::create(path).await?;
    let mut last_reported = 0u64;

    while let Some(chunk) = stream.chunks.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                // Leave the truncated file fully on disk before reporting
                file.flush().await?;
                return Err(e);
            }
        };
        file.write_all(&chunk).await?;
        state.advance(chunk.len() as u64);

        if state.downloaded() - last_reported >= PROGRESS_STEP {
            last_reported = state.downloaded();
            // A closed receiver only means nobody is watching
            let _ = progress.send(state.snapshot()).await;
        }
    }

    file.flush().await?;
    Ok(())
}
