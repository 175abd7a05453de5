// Blocking diagnostics - why yt-dlp could not resolve a video
//
// Maps yt-dlp error output to a small set of reasons, each with one line
// of advice for the user.

use regex::Regex;

lazy_static::lazy_static! {
    static ref HTTP_STATUS_RE: Regex = Regex::new(r"HTTP Error (\d{3})").unwrap();
}

/// Reasons why the site might refuse a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingReason {
    /// HTTP 403 Forbidden - general access denied
    Http403Forbidden,

    /// Age-restricted content requiring login
    AgeRestricted,

    /// Geographic restriction
    GeoBlocked,

    /// Network timeout (soft IP block)
    NetworkTimeout,

    /// Rate limiting (429 or similar)
    RateLimited,

    /// Bot detection triggered
    BotDetection,

    /// Private video requiring authorization
    PrivateVideo,

    /// Video deleted or unavailable
    VideoUnavailable,

    /// DRM-protected or paid content; cannot be downloaded at all
    DrmProtected,

    /// Member-only content (requires channel membership)
    MembersOnly,
}

impl BlockingReason {
    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Http403Forbidden => "Access denied (HTTP 403)",
            Self::AgeRestricted => "Age-restricted content",
            Self::GeoBlocked => "Geographic restriction",
            Self::NetworkTimeout => "Network timeout",
            Self::RateLimited => "Rate limited by YouTube",
            Self::BotDetection => "Bot detection triggered",
            Self::PrivateVideo => "Private video",
            Self::VideoUnavailable => "Video unavailable",
            Self::DrmProtected => "DRM-protected content",
            Self::MembersOnly => "Members-only content",
        }
    }

    /// One line of advice
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Http403Forbidden | Self::BotDetection => {
                "Update yt-dlp, or retry through a proxy (YOUTUBE_MUXER_PROXY)."
            }
            Self::RateLimited => "Wait 10-15 minutes or use a different network.",
            Self::NetworkTimeout => "Check your connection or raise YOUTUBE_MUXER_TIMEOUT.",
            Self::GeoBlocked => "The video is blocked in your region; a proxy in another country may help.",
            Self::AgeRestricted | Self::MembersOnly | Self::PrivateVideo => {
                "This video needs a signed-in account and cannot be fetched anonymously."
            }
            Self::VideoUnavailable => "The video was removed or the URL is wrong.",
            Self::DrmProtected => "DRM-protected videos cannot be downloaded.",
        }
    }

    fn from_http_status(status: u16) -> Option<Self> {
        match status {
            403 => Some(Self::Http403Forbidden),
            404 | 410 => Some(Self::VideoUnavailable),
            429 => Some(Self::RateLimited),
            _ => None,
        }
    }
}

/// Analyze error message and return blocking reason
pub fn diagnose_error(error: &str) -> Option<BlockingReason> {
    let lower = error.to_lowercase();

    // Check patterns in order of specificity

    if lower.contains("drm")
        || lower.contains("widevine")
        || lower.contains("requires purchase")
        || lower.contains("this video requires payment")
    {
        return Some(BlockingReason::DrmProtected);
    }

    if lower.contains("members-only")
        || lower.contains("members only")
        || lower.contains("join this channel")
    {
        return Some(BlockingReason::MembersOnly);
    }

    if lower.contains("sign in to confirm your age") || lower.contains("age-restricted") {
        return Some(BlockingReason::AgeRestricted);
    }

    if lower.contains("private video") || lower.contains("video is private") {
        return Some(BlockingReason::PrivateVideo);
    }

    // yt-dlp prefixes geo blocks with "Video unavailable."
    if lower.contains("available in your country") || lower.contains("blocked in your country") {
        return Some(BlockingReason::GeoBlocked);
    }

    if lower.contains("video unavailable")
        || lower.contains("video has been removed")
        || lower.contains("no longer available")
    {
        return Some(BlockingReason::VideoUnavailable);
    }

    // YouTube writes "you’re" with a typographic apostrophe
    if lower.contains("not a bot")
        || lower.contains("captcha")
        || lower.contains("unusual traffic")
    {
        return Some(BlockingReason::BotDetection);
    }

    if lower.contains("too many requests") || lower.contains("rate limit") {
        return Some(BlockingReason::RateLimited);
    }

    // Explicit status codes from the extractor
    if let Some(reason) = HTTP_STATUS_RE
        .captures(error)
        .and_then(|caps| caps[1].parse::<u16>().ok())
        .and_then(BlockingReason::from_http_status)
    {
        return Some(reason);
    }

    if lower.contains("timed out") || lower.contains("timeout") || lower.contains("network is unreachable") {
        return Some(BlockingReason::NetworkTimeout);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_detection() {
        assert_eq!(
            diagnose_error("ERROR: unable to download video data: HTTP Error 403: Forbidden"),
            Some(BlockingReason::Http403Forbidden)
        );
        assert_eq!(
            diagnose_error("ERROR: HTTP Error 429: Too Many Requests"),
            Some(BlockingReason::RateLimited)
        );
        assert_eq!(
            diagnose_error("ERROR: HTTP Error 404: Not Found"),
            Some(BlockingReason::VideoUnavailable)
        );
        assert_eq!(diagnose_error("ERROR: HTTP Error 500: Internal"), None);
    }

    #[test]
    fn test_message_detection() {
        assert_eq!(
            diagnose_error("ERROR: [youtube] xyz: Sign in to confirm your age"),
            Some(BlockingReason::AgeRestricted)
        );
        assert_eq!(
            diagnose_error("ERROR: [youtube] xyz: Sign in to confirm you're not a bot"),
            Some(BlockingReason::BotDetection)
        );
        assert_eq!(
            diagnose_error("ERROR: [youtube] xyz: Video unavailable. This video has been removed"),
            Some(BlockingReason::VideoUnavailable)
        );
        assert_eq!(
            diagnose_error("The uploader has not made this video available in your country"),
            Some(BlockingReason::GeoBlocked)
        );
        assert_eq!(
            diagnose_error("This video is not available in your country"),
            Some(BlockingReason::GeoBlocked)
        );
        assert_eq!(
            diagnose_error(
                "ERROR: [youtube] x: Sign in to confirm you\u{2019}re not a bot. Use --cookies-from-browser"
            ),
            Some(BlockingReason::BotDetection)
        );
        assert_eq!(
            diagnose_error(
                "ERROR: [youtube] abc: Video unavailable. The uploader has not made this video available in your country"
            ),
            Some(BlockingReason::GeoBlocked)
        );
        assert_eq!(
            diagnose_error("Read timed out."),
            Some(BlockingReason::NetworkTimeout)
        );
    }
}
