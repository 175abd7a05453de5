// Common data models for the download pipeline

use std::fmt;
use std::path::PathBuf;

/// What an encoding carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    VideoOnly,
    AudioOnly,
    /// Muxed video+audio (progressive) formats; never selected
    Combined,
}

impl MediaKind {
    /// Classify from yt-dlp codec fields, where "none" means absent
    pub fn from_codecs(vcodec: Option<&str>, acodec: Option<&str>) -> Option<Self> {
        let present = |c: Option<&str>| c.map_or(false, |c| c != "none" && !c.is_empty());

        match (present(vcodec), present(acodec)) {
            (true, false) => Some(Self::VideoOnly),
            (false, true) => Some(Self::AudioOnly),
            (true, true) => Some(Self::Combined),
            (false, false) => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VideoOnly => write!(f, "video-only"),
            Self::AudioOnly => write!(f, "audio-only"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

/// One downloadable representation of the remote media
#[derive(Debug, Clone)]
pub struct Encoding {
    /// Provider format ID (e.g., "137", "251")
    pub format_id: String,
    pub kind: MediaKind,
    /// Container extension (webm, m4a, mp4)
    pub ext: String,
    /// Rank within its kind: pixel height for video, kbps for audio
    pub quality: u32,
    /// Declared size in bytes, when the provider knows it
    pub byte_length: Option<u64>,
    /// Direct media URL
    pub url: String,
    /// Headers the media host expects on the request
    pub http_headers: Vec<(String, String)>,
}

/// A resolved remote video
#[derive(Debug, Clone)]
pub struct VideoReference {
    pub url: String,
    pub id: String,
    /// Raw title as published, may contain characters unusable in paths
    pub title: String,
    pub encodings: Vec<Encoding>,
}

/// Which of the two concurrent transfers an event or file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamRole {
    Video,
    Audio,
}

impl StreamRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    InProgress,
    Completed,
    Failed,
}

/// Snapshot of one transfer, published on the progress channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub role: StreamRole,
    pub downloaded: u64,
    /// `None` when neither the provider nor the server declared a length
    pub total: Option<u64>,
    pub status: TransferStatus,
}

impl TransferProgress {
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.downloaded as f64 * 100.0 / total as f64),
            _ => None,
        }
    }
}

/// Per-stream transfer bookkeeping, owned by the fetch task
#[derive(Debug)]
pub struct TransferState {
    role: StreamRole,
    downloaded: u64,
    total: Option<u64>,
    status: TransferStatus,
}

impl TransferState {
    pub fn new(role: StreamRole, total: Option<u64>) -> Self {
        Self {
            role,
            downloaded: 0,
            total: total.filter(|t| *t > 0),
            status: TransferStatus::InProgress,
        }
    }

    pub fn set_total(&mut self, total: Option<u64>) {
        self.total = total.filter(|t| *t > 0);
    }

    pub fn advance(&mut self, bytes: u64) {
        self.downloaded = self.downloaded.saturating_add(bytes);
    }

    pub fn complete(&mut self) {
        self.status = TransferStatus::Completed;
    }

    pub fn fail(&mut self) {
        self.status = TransferStatus::Failed;
    }

    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    pub fn snapshot(&self) -> TransferProgress {
        TransferProgress {
            role: self.role,
            downloaded: self.downloaded,
            total: self.total,
            status: self.status,
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub title: String,
    pub output: PathBuf,
    pub video_bytes: u64,
    pub audio_bytes: u64,
}
