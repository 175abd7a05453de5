// Title -> file name stem
//
// Remote titles routinely carry path separators, Windows-reserved
// characters and emoji. The stem must be usable on every platform and
// stable across runs, because the stale-file guard relies on the next run
// computing the same paths.

use regex::Regex;

lazy_static::lazy_static! {
    static ref ILLEGAL_RE: Regex = Regex::new(r#"[<>:"/\\|?*]+"#).unwrap();
}

/// Produce a filesystem-safe stem from a raw title.
///
/// Deletes `< > : " / \ | ? *`, pictographic glyphs (with their variation
/// selectors, joiners and modifiers) and control characters, then trims
/// surrounding whitespace. Remaining characters keep their order. The
/// result may be empty; callers must reject that.
pub fn sanitize_title(raw: &str) -> String {
    let without_illegal = ILLEGAL_RE.replace_all(raw, "");

    without_illegal
        .chars()
        .filter(|c| !is_pictographic(*c) && !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Emoji and the invisible code points that glue emoji sequences together.
fn is_pictographic(c: char) -> bool {
    matches!(
        c as u32,
        // Mahjong, cards, enclosed supplements, regional indicators,
        // pictographs, emoticons, transport, skin tones, chess, ext-A
        0x1F000..=0x1FAFF
            // Misc symbols and dingbats
            | 0x2600..=0x27BF
            // Emoji presentation in misc technical
            | 0x231A..=0x231B
            | 0x2328
            | 0x23CF
            | 0x23E9..=0x23F3
            | 0x23F8..=0x23FA
            // Arrows, squares, star, circle
            | 0x2B05..=0x2B07
            | 0x2B1B..=0x2B1C
            | 0x2B50
            | 0x2B55
            // CJK ideograph emoji
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            // Zero-width joiner, keycap combiner
            | 0x200D
            | 0x20E3
            // Variation selectors
            | 0xFE00..=0xFE0F
            // Tag sequences (subdivision flags)
            | 0xE0020..=0xE007F
    )
}
