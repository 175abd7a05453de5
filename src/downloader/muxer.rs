// ffmpeg invocation that joins the two streams into one mp4
//
// The video stream is copied as-is, audio is encoded to AAC so the result
// plays in QuickTime and browsers even when the source audio is Opus.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::errors::RunError;
use super::utils::run_output;

pub struct Muxer {
    ffmpeg: PathBuf,
}

impl Muxer {
    pub fn new(ffmpeg: PathBuf) -> Self {
        Self { ffmpeg }
    }

    /// Argument vector passed to ffmpeg; paths are never re-quoted or
    /// interpreted by a shell.
    pub fn build_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-nostdin"]
            .iter()
            .map(OsString::from)
            .collect();

        args.push("-i".into());
        args.push(video.into());
        args.push("-i".into());
        args.push(audio.into());
        args.extend(["-c:v", "copy", "-c:a", "aac"].iter().map(OsString::from));
        args.push(output.into());
        args
    }

    /// Run ffmpeg to completion. Never deletes anything: the caller decides
    /// what happens to the inputs and a partially written output.
    pub async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), RunError> {
        let args = Self::build_args(video, audio, output);
        debug!(ffmpeg = %self.ffmpeg.display(), ?args, "muxing");

        let result = run_output(&self.ffmpeg, &args, None)
            .await
            .map_err(|e| RunError::MuxFailed {
                code: None,
                detail: e,
            })?;

        if result.status.success() {
            info!(output = %output.display(), "mux complete");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&result.stderr);
        let detail = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("ffmpeg reported no error message")
            .to_string();

        warn!(code = ?result.status.code(), %detail, "ffmpeg failed");
        Err(RunError::MuxFailed {
            code: result.status.code(),
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_order() {
        let args = Muxer::build_args(
            Path::new("/t/My \"Video\" $(rm).video.webm"),
            Path::new("/t/My \"Video\" $(rm).audio.webm"),
            Path::new("/o/My \"Video\" $(rm).mp4"),
        );
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(
            args,
            vec![
                "-hide_banner",
                "-loglevel",
                "error",
                "-nostdin",
                "-i",
                "/t/My \"Video\" $(rm).video.webm",
                "-i",
                "/t/My \"Video\" $(rm).audio.webm",
                "-c:v",
                "copy",
                "-c:a",
                "aac",
                "/o/My \"Video\" $(rm).mp4",
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Muxer::new(PathBuf::from("/bin/false"));
        let err = muxer
            .mux(&dir.path().join("v"), &dir.path().join("a"), &dir.path().join("o.mp4"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::MuxFailed { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Muxer::new(PathBuf::from("/bin/true"));
        muxer
            .mux(&dir.path().join("v"), &dir.path().join("a"), &dir.path().join("o.mp4"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let muxer = Muxer::new(dir.path().join("no-ffmpeg-here"));
        let err = muxer
            .mux(&dir.path().join("v"), &dir.path().join("a"), &dir.path().join("o.mp4"))
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::MuxFailed { code: None, .. }));
    }
}
