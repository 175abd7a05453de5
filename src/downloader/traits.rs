// Stream provider trait definition

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use super::errors::ProviderError;
use super::models::{Encoding, VideoReference};

/// An opened media stream
pub struct ByteStream {
    /// Length announced by the server, if any
    pub content_length: Option<u64>,
    pub chunks: BoxStream<'static, Result<Bytes, ProviderError>>,
}

/// Source of video metadata and media bytes
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// Resolve a URL into its title and available encodings
    async fn resolve(&self, url: &str) -> Result<VideoReference, ProviderError>;

    /// Open the byte stream of one encoding
    async fn open_stream(&self, encoding: &Encoding) -> Result<ByteStream, ProviderError>;
}
