// Downloader module - fetch, mux and clean up one video per run

pub mod cleanup;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod fetcher;
pub mod format_selector;
pub mod models;
pub mod muxer;
pub mod orchestrator;
pub mod paths;
pub mod reporter;
pub mod sanitize;
pub mod tools;
pub mod traits;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, NetworkConfig};
pub use errors::{ProviderError, RunError};
pub use extractors::YtDlpProvider;
pub use models::{RunSummary, VideoReference};
pub use muxer::Muxer;
pub use orchestrator::RunOrchestrator;
pub use reporter::Reporter;
pub use tools::{ToolManager, ToolType};
pub use traits::StreamProvider;
