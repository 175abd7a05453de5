// Error types for the provider seam and the run pipeline

use std::path::PathBuf;

use thiserror::Error;

use super::extractors::{diagnose_error, BlockingReason};
use super::models::{MediaKind, StreamRole};

/// Failures raised by a stream provider (yt-dlp lookup or HTTP streaming)
#[derive(Debug, Error)]
pub enum ProviderError {
    /// yt-dlp not found in system
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// URL rejected by the extractor
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse yt-dlp JSON output
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Command execution failed
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// The site refused to serve the video
    #[error("{}: {detail}", reason.description())]
    Blocked {
        reason: BlockingReason,
        detail: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown error with details
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Blocking reason behind this failure, if one was recognised
    pub fn blocking_reason(&self) -> Option<BlockingReason> {
        match self {
            Self::Blocked { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

// Classify raw yt-dlp stderr
impl From<String> for ProviderError {
    fn from(s: String) -> Self {
        let detail = last_meaningful_line(&s);

        if let Some(reason) = diagnose_error(&s) {
            return Self::Blocked { reason, detail };
        }

        let lower = s.to_lowercase();

        if lower.contains("command not found") || lower.contains("no such file") {
            return Self::ToolNotFound(detail);
        }

        if lower.contains("unsupported url") || lower.contains("is not a valid url") {
            return Self::InvalidUrl(detail);
        }

        if lower.contains("json") {
            return Self::ParseError(detail);
        }

        Self::Unknown(detail)
    }
}

/// yt-dlp prints a wall of warnings before the actual `ERROR:` line
fn last_meaningful_line(s: &str) -> String {
    s.lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| s.lines().rev().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or("")
        .to_string()
}

/// Terminal failures of a run; every variant aborts the pipeline
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid URL provided")]
    InvalidInput,

    #[error("Failed to retrieve video information: {0}")]
    InfoRetrievalFailed(#[source] ProviderError),

    #[error("No {missing} encoding available for this video")]
    NoSuitableEncoding { missing: MediaKind },

    #[error("Title {title:?} has no characters usable in a file name")]
    EmptyTitle { title: String },

    #[error("Failed to download {role} stream: {reason}")]
    TransferFailed { role: StreamRole, reason: String },

    #[error("Failed to merge files ({}): {detail}", exit_label(*code))]
    MuxFailed { code: Option<i32>, detail: String },

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "not started".to_string(),
    }
}

impl RunError {
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Short follow-up advice shown under the error line
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InfoRetrievalFailed(ProviderError::ToolNotFound(_)) => {
                Some("Check that yt-dlp is installed or set YTDLP_PATH.")
            }
            Self::InfoRetrievalFailed(e) => e.blocking_reason().map(|r| r.hint()),
            Self::MuxFailed { code: None, .. } => Some("Check that ffmpeg is installed or set FFMPEG_PATH."),
            Self::TransferFailed { .. } => {
                Some("Partial files are kept in the temp folder and removed on the next run.")
            }
            Self::MuxFailed { .. } => {
                Some("The downloaded streams were kept in the temp folder for inspection.")
            }
            _ => None,
        }
    }
}
