// yt-dlp stream provider
//
// Metadata comes from `yt-dlp --dump-single-json`; the media bytes are
// fetched straight from each format's direct URL with reqwest, so both
// streams can be written and reported on independently.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info, warn};

use crate::downloader::config::NetworkConfig;
use crate::downloader::errors::ProviderError;
use crate::downloader::models::{Encoding, MediaKind, VideoReference};
use crate::downloader::traits::{ByteStream, StreamProvider};
use crate::downloader::utils::{get_proxy_args, get_timeout_args, run_output};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct YtDlpProvider {
    ytdlp_path: PathBuf,
    network: NetworkConfig,
    info_timeout_secs: u64,
    client: reqwest::Client,
}

impl YtDlpProvider {
    pub fn new(
        ytdlp_path: PathBuf,
        network: NetworkConfig,
        info_timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

        // Connect timeout only: a body transfer may legitimately take hours
        if let Some(secs) = network.timeout {
            builder = builder.connect_timeout(Duration::from_secs(u64::from(secs)));
        }
        if let Some(proxy) = &network.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            ytdlp_path,
            network,
            info_timeout_secs,
            client: builder.build()?,
        })
    }

    /// Build command arguments
    fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--no-check-certificates".to_string(),
            "--prefer-free-formats".to_string(),
            "--add-header".to_string(),
            "referer:youtube.com".to_string(),
            "--add-header".to_string(),
            format!("user-agent:{}", USER_AGENT),
        ];

        args.extend(get_timeout_args(&self.network));
        args.extend(get_proxy_args(&self.network));

        // End of options: a URL starting with '-' stays a URL
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }

    fn parse_json(url: &str, stdout: &[u8]) -> Result<VideoReference, ProviderError> {
        let json: serde_json::Value = serde_json::from_slice(stdout)
            .map_err(|e| ProviderError::ParseError(format!("Invalid JSON: {}", e)))?;

        let formats = json["formats"]
            .as_array()
            .ok_or_else(|| ProviderError::ParseError("No formats array in JSON".to_string()))?;

        Ok(VideoReference {
            url: url.to_string(),
            id: json["id"].as_str().unwrap_or("unknown").to_string(),
            title: json["title"].as_str().unwrap_or("Unknown").to_string(),
            encodings: formats.iter().filter_map(Self::parse_format).collect(),
        })
    }

    /// One yt-dlp format entry; skips storyboards and fragmented protocols
    /// (HLS/DASH manifests) that cannot be fetched with a single GET.
    fn parse_format(f: &serde_json::Value) -> Option<Encoding> {
        let protocol = f["protocol"].as_str().unwrap_or("https");
        if protocol != "https" && protocol != "http" {
            return None;
        }

        let url = f["url"].as_str()?;
        let kind = MediaKind::from_codecs(f["vcodec"].as_str(), f["acodec"].as_str())?;

        let quality = match kind {
            MediaKind::AudioOnly => f["abr"].as_f64().or_else(|| f["tbr"].as_f64()).unwrap_or(0.0).round() as u32,
            _ => f["height"].as_u64().unwrap_or(0) as u32,
        };

        let http_headers = f["http_headers"]
            .as_object()
            .map(|headers| {
                headers
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        Some(Encoding {
            format_id: f["format_id"].as_str().unwrap_or("").to_string(),
            kind,
            ext: f["ext"].as_str().unwrap_or("bin").to_string(),
            quality,
            byte_length: f["filesize"].as_u64().or_else(|| f["filesize_approx"].as_u64()),
            url: url.to_string(),
            http_headers,
        })
    }

    fn header_map(encoding: &Encoding) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in &encoding.http_headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "skipping malformed header"),
            }
        }
        headers
    }
}

#[async_trait]
impl StreamProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, url: &str) -> Result<VideoReference, ProviderError> {
        let args = self.build_args(url);
        debug!(ytdlp = %self.ytdlp_path.display(), args = %args.join(" "), "resolving");

        let output = run_output(&self.ytdlp_path, &args, Some(self.info_timeout_secs))
            .await
            .map_err(|e| {
                if e.starts_with("Failed to start") {
                    ProviderError::ToolNotFound(e)
                } else {
                    ProviderError::ExecutionError(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ProviderError::from(stderr));
        }

        let video = Self::parse_json(url, &output.stdout)?;
        info!(id = %video.id, encodings = video.encodings.len(), "resolved video");
        Ok(video)
    }

    async fn open_stream(&self, encoding: &Encoding) -> Result<ByteStream, ProviderError> {
        let response = self
            .client
            .get(&encoding.url)
            .headers(Self::header_map(encoding))
            .send()
            .await?
            .error_for_status()?;

        let content_length = response.content_length();
        debug!(format = %encoding.format_id, ?content_length, "stream opened");

        Ok(ByteStream {
            content_length,
            chunks: response.bytes_stream().map_err(ProviderError::from).boxed(),
        })
    }
}
