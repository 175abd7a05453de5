// FormatSelector - picks the pair of encodings to download
//
// The muxer needs one video-only and one audio-only stream. Combined
// (progressive) formats are ignored: they top out at low resolutions and
// would carry a second audio track into the mux.
//
// Ranking:
// - Video: highest height
// - Audio: highest bitrate
// - Ties: largest declared size, then first listed

use super::errors::RunError;
use super::models::{Encoding, MediaKind, VideoReference};

/// Encodings chosen for one run
#[derive(Debug, Clone)]
pub struct SelectedEncodings {
    pub video: Encoding,
    pub audio: Encoding,
}

pub struct FormatSelector;

impl FormatSelector {
    /// Select the best video-only and audio-only encodings
    pub fn select(video: &VideoReference) -> Result<SelectedEncodings, RunError> {
        let best_video = Self::find_best(&video.encodings, MediaKind::VideoOnly).ok_or(
            RunError::NoSuitableEncoding {
                missing: MediaKind::VideoOnly,
            },
        )?;

        let best_audio = Self::find_best(&video.encodings, MediaKind::AudioOnly).ok_or(
            RunError::NoSuitableEncoding {
                missing: MediaKind::AudioOnly,
            },
        )?;

        Ok(SelectedEncodings {
            video: best_video.clone(),
            audio: best_audio.clone(),
        })
    }

    /// Highest-ranked encoding of `kind`.
    ///
    /// Only a strictly better candidate replaces the current pick, so among
    /// equal ranks the first listed wins. `max_by_key` would keep the last.
    fn find_best(encodings: &[Encoding], kind: MediaKind) -> Option<&Encoding> {
        encodings
            .iter()
            .filter(|e| e.kind == kind)
            .fold(None, |best: Option<&Encoding>, candidate| match best {
                Some(current) if Self::rank(candidate) <= Self::rank(current) => Some(current),
                _ => Some(candidate),
            })
    }

    fn rank(encoding: &Encoding) -> (u32, u64) {
        (encoding.quality, encoding.byte_length.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_format(id: &str, kind: MediaKind, quality: u32, size: Option<u64>) -> Encoding {
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

    fn make_video(encodings: Vec<Encoding>) -> VideoReference {
        VideoReference {
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            id: "abc".to_string(),
            title: "Test".to_string(),
            encodings,
        }
    }

    #[test]
    fn test_picks_highest_quality_per_kind() {
        let video = make_video(vec![
            make_format("18", MediaKind::Combined, 2160, Some(1)),
            make_format("247", MediaKind::VideoOnly, 720, Some(50_000_000)),
            make_format("248", MediaKind::VideoOnly, 1080, Some(90_000_000)),
            make_format("250", MediaKind::AudioOnly, 70, Some(3_000_000)),
            make_format("251", MediaKind::AudioOnly, 160, Some(5_000_000)),
        ]);

        let selected = FormatSelector::select(&video).unwrap();

        assert_eq!(selected.video.format_id, "248");
        assert_eq!(selected.audio.format_id, "251");
    }

    #[test]
    fn test_tie_break_by_size_then_order() {
        let video = make_video(vec![
            make_format("a", MediaKind::VideoOnly, 1080, Some(10)),
            make_format("b", MediaKind::VideoOnly, 1080, Some(30)),
            make_format("c", MediaKind::VideoOnly, 1080, Some(30)),
            make_format("x", MediaKind::AudioOnly, 128, None),
            make_format("y", MediaKind::AudioOnly, 128, None),
        ]);

        let selected = FormatSelector::select(&video).unwrap();

        assert_eq!(selected.video.format_id, "b");
        assert_eq!(selected.audio.format_id, "x");
    }

    #[test]
    fn test_missing_audio() {
        let video = make_video(vec![
            make_format("248", MediaKind::VideoOnly, 1080, None),
            make_format("18", MediaKind::Combined, 360, None),
        ]);

        let err = FormatSelector::select(&video).unwrap_err();
        assert!(matches!(
            err,
            RunError::NoSuitableEncoding {
                missing: MediaKind::AudioOnly
            }
        ));
    }

    #[test]
    fn test_missing_video() {
        let video = make_video(vec![make_format("251", MediaKind::AudioOnly, 160, None)]);

        let err = FormatSelector::select(&video).unwrap_err();
        assert!(matches!(
            err,
            RunError::NoSuitableEncoding {
                missing: MediaKind::VideoOnly
            }
        ));
    }
}
