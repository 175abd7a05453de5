// Download locations for a run

use std::path::{Path, PathBuf};

use super::errors::RunError;

/// Folder under the user's Downloads directory that receives finished files
pub const APP_FOLDER: &str = "Youtube Downloads";

/// Subfolder of [`APP_FOLDER`] holding unmerged streams
pub const TEMP_FOLDER: &str = "temp";

pub const OUTPUT_EXT: &str = "mp4";

/// Platform Downloads directory, falling back to `~/Downloads`
pub fn default_download_root() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Paths of one run, all derived from the same sanitized stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub stem: String,
    pub video_temp: PathBuf,
    pub audio_temp: PathBuf,
    pub output: PathBuf,
}

impl RunContext {
    /// Compute the run paths under `root` and create the output and temp
    /// folders. Calling it again with the same arguments yields the same
    /// paths; existing folders are not an error.
    pub fn resolve(
        root: &Path,
        stem: &str,
        video_ext: &str,
        audio_ext: &str,
    ) -> Result<Self, RunError> {
        if stem.trim().is_empty() {
            return Err(RunError::EmptyTitle {
                title: stem.to_string(),
            });
        }

        let output_dir = root.join(APP_FOLDER);
        let temp_dir = output_dir.join(TEMP_FOLDER);

        std::fs::create_dir_all(&temp_dir).map_err(|e| RunError::filesystem(&temp_dir, e))?;

        Ok(Self {
            stem: stem.to_string(),
            video_temp: temp_dir.join(format!("{}.video.{}", stem, video_ext)),
            audio_temp: temp_dir.join(format!("{}.audio.{}", stem, audio_ext)),
            output: output_dir.join(format!("{}.{}", stem, OUTPUT_EXT)),
        })
    }

    /// Every path this run writes, temp files first
    pub fn all_paths(&self) -> [&Path; 3] {
        [&self.video_temp, &self.audio_temp, &self.output]
    }

    pub fn temp_paths(&self) -> [&Path; 2] {
        [&self.video_temp, &self.audio_temp]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let root = tempfile::tempdir().unwrap();
        let ctx = RunContext::resolve(root.path(), "My Video Part 12", "webm", "m4a").unwrap();

        let app = root.path().join("Youtube Downloads");
        assert_eq!(ctx.output, app.join("My Video Part 12.mp4"));
        assert_eq!(ctx.video_temp, app.join("temp").join("My Video Part 12.video.webm"));
        assert_eq!(ctx.audio_temp, app.join("temp").join("My Video Part 12.audio.m4a"));
        assert!(app.join("temp").is_dir());
    }

    #[test]
    fn test_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let first = RunContext::resolve(root.path(), "clip", "webm", "webm").unwrap();
        let second = RunContext::resolve(root.path(), "clip", "webm", "webm").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_stem_rejected_before_io() {
        let root = tempfile::tempdir().unwrap();
        let err = RunContext::resolve(root.path(), "  ", "webm", "webm").unwrap_err();
        assert!(matches!(err, RunError::EmptyTitle { .. }));
        assert!(!root.path().join(APP_FOLDER).exists());
    }

    #[test]
    fn test_directory_creation_failure() {
        let root = tempfile::tempdir().unwrap();
        // A regular file where the app folder should go
        let blocker = root.path().join(APP_FOLDER);
        std::fs::write(&blocker, b"").unwrap();

        let err = RunContext::resolve(root.path(), "clip", "webm", "webm").unwrap_err();
        assert!(matches!(err, RunError::Filesystem { .. }));
    }
}
