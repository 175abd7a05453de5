// Extractors - resolve a video page into downloadable encodings
//
// yt-dlp does the page scraping; diagnostics turns its error output into
// something a user can act on.

mod diagnostics;
mod ytdlp;

pub use diagnostics::{diagnose_error, BlockingReason};
pub use ytdlp::YtDlpProvider;
