// Runtime configuration: defaults plus environment overrides
//
// The folder layout is fixed; only tool locations and network settings
// can be overridden.

use std::path::PathBuf;

use tracing::warn;

use super::paths::default_download_root;

pub const ENV_YTDLP_PATH: &str = "YTDLP_PATH";
pub const ENV_FFMPEG_PATH: &str = "FFMPEG_PATH";
pub const ENV_PROXY: &str = "YOUTUBE_MUXER_PROXY";
pub const ENV_TIMEOUT: &str = "YOUTUBE_MUXER_TIMEOUT";

/// Network configuration for yt-dlp and the media requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// SOCKS5/HTTP proxy URL (e.g., "socks5://127.0.0.1:1080")
    pub proxy: Option<String>,

    /// Socket timeout in seconds
    pub timeout: Option<u32>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: Some(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that contains the app folder
    pub download_root: PathBuf,
    /// Explicit yt-dlp binary; discovered when unset
    pub ytdlp_path: Option<PathBuf>,
    /// Explicit ffmpeg binary; discovered when unset
    pub ffmpeg_path: Option<PathBuf>,
    pub network: NetworkConfig,
    /// Upper bound for the metadata lookup
    pub info_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_root: default_download_root(),
            ytdlp_path: None,
            ffmpeg_path: None,
            network: NetworkConfig::default(),
            info_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default()
            .with_ytdlp_path(non_empty(ENV_YTDLP_PATH).map(PathBuf::from))
            .with_ffmpeg_path(non_empty(ENV_FFMPEG_PATH).map(PathBuf::from))
            .with_proxy(non_empty(ENV_PROXY));

        if let Some(raw) = non_empty(ENV_TIMEOUT) {
            match raw.trim().parse::<u32>() {
                Ok(secs) if secs > 0 => config = config.with_timeout(secs),
                _ => warn!(value = %raw, "ignoring invalid {}", ENV_TIMEOUT),
            }
        }

        config
    }

    pub fn with_download_root(mut self, root: PathBuf) -> Self {
        self.download_root = root;
        self
    }

    pub fn with_ytdlp_path(mut self, path: Option<PathBuf>) -> Self {
        self.ytdlp_path = path;
        self
    }

    pub fn with_ffmpeg_path(mut self, path: Option<PathBuf>) -> Self {
        self.ffmpeg_path = path;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.network.proxy = proxy;
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.network.timeout = Some(seconds);
        self
    }
}
