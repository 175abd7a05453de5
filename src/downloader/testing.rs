// In-memory stream provider for tests

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};

use super::errors::ProviderError;
use super::models::{Encoding, MediaKind, VideoReference};
use super::traits::{ByteStream, StreamProvider};

pub fn encoding(id: &str, kind: MediaKind, quality: u32, size: Option<u64>) -> Encoding {
    Encoding {
        format_id: id.to_string(),
        kind,
        ext: "webm".to_string(),
        quality,
        byte_length: size,
        url: format!("https://media.example/{}", id),
        http_headers: Vec::new(),
    }
}

enum Script {
    Body { len: usize, chunk: usize },
    FailAfter { len: usize, chunk: usize },
}

/// Serves fixed-size bodies per format ID; unknown formats fail to open
pub struct ScriptedProvider {
    video: Option<VideoReference>,
    scripts: HashMap<String, Script>,
    announce_length: bool,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            video: None,
            scripts: HashMap::new(),
            announce_length: true,
        }
    }

    pub fn with_video(mut self, video: VideoReference) -> Self {
        self.video = Some(video);
        self
    }

    pub fn body(mut self, format_id: &str, len: usize, chunk: usize) -> Self {
        self.scripts
            .insert(format_id.to_string(), Script::Body { len, chunk });
        self
    }

    /// Serve `len` bytes, then break the connection
    pub fn fail_after(mut self, format_id: &str, len: usize, chunk: usize) -> Self {
        self.scripts
            .insert(format_id.to_string(), Script::FailAfter { len, chunk });
        self
    }

    /// Do not send a content length
    pub fn hide_length(mut self) -> Self {
        self.announce_length = false;
        self
    }
}

fn chunks(len: usize, chunk: usize) -> Vec<Result<Bytes, ProviderError>> {
    let mut out = Vec::new();
    let mut left = len;
    while left > 0 {
        let n = left.min(chunk.max(1));
        out.push(Ok(Bytes::from(vec![0xAB; n])));
        left -= n;
    }
    out
}

#[async_trait]
impl StreamProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn resolve(&self, url: &str) -> Result<VideoReference, ProviderError> {
        self.video
            .clone()
            .ok_or_else(|| ProviderError::from(format!("ERROR: [youtube] {}: Video unavailable", url)))
    }

    async fn open_stream(&self, encoding: &Encoding) -> Result<ByteStream, ProviderError> {
        let script = self
            .scripts
            .get(&encoding.format_id)
            .ok_or_else(|| ProviderError::Unknown(format!("no body for {}", encoding.format_id)))?;

        let (len, items) = match script {
            Script::Body { len, chunk } => (*len, chunks(*len, *chunk)),
            Script::FailAfter { len, chunk } => {
                let mut items = chunks(*len, *chunk);
                items.push(Err(ProviderError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ))));
                (*len * 2, items)
            }
        };

        Ok(ByteStream {
            content_length: self.announce_length.then_some(len as u64),
            chunks: stream::iter(items).boxed(),
        })
    }
}
