use once_cell::sync::Lazy;
use regex::Regex;

/// One timed cue as parsed from upstream markup, prior to normalization.
///
/// Timing values are in whichever units the originating strategy declares;
/// conversion to milliseconds happens in [`crate::segments::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawCue {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

// Cue shapes in decreasing order of confidence. The upstream markup is not
// guaranteed stable between calls or strategies, so every shape observed in
// the wild gets its own matcher.
static START_DUR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text[^>]*\bstart="([0-9.]+)"[^>]*\bdur="([0-9.]+)"[^>]*>(.*?)</text>"#).unwrap()
});
static START_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text[^>]*\bstart="([0-9.]+)"[^>]*\bduration="([0-9.]+)"[^>]*>(.*?)</text>"#)
        .unwrap()
});
static START_ANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text[^>]*\bstart="([0-9.]+)"[^>]*>(.*?)</text>"#).unwrap()
});
static INLINE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Extract an ordered cue sequence from raw caption markup.
///
/// Never fails: malformed input yields an empty vec. Shapes are tried in a
/// fixed priority order and the first one producing at least one cue with
/// non-empty decoded text wins.
pub fn parse_cues(raw: &str) -> Vec<RawCue> {
    let shapes: [fn(&str) -> Vec<RawCue>; 4] = [
        parse_start_dur,
        parse_start_duration,
        parse_start_only,
        parse_bare_text,
    ];

    for shape in shapes {
        let cues = shape(raw);
        if !cues.is_empty() {
            return cues;
        }
    }

    Vec::new()
}

fn parse_start_dur(raw: &str) -> Vec<RawCue> {
    START_DUR
        .captures_iter(raw)
        .filter_map(|caps| {
            timed_cue(&caps[1], &caps[2], &caps[3])
        })
        .collect()
}

fn parse_start_duration(raw: &str) -> Vec<RawCue> {
    START_DURATION
        .captures_iter(raw)
        .filter_map(|caps| timed_cue(&caps[1], &caps[2], &caps[3]))
        .collect()
}

// Tolerates reordered or missing duration attributes; duration defaults to 0.
// Still requires a closing tag: a self-closing cue has no body, so it could
// never produce non-empty text and is dropped like any other empty cue.
fn parse_start_only(raw: &str) -> Vec<RawCue> {
    START_ANY
        .captures_iter(raw)
        .filter_map(|caps| timed_cue(&caps[1], "0", &caps[2]))
        .collect()
}

// Last resort: no timing markup at all. Each non-empty line becomes a cue
// with synthesized sequential timing.
fn parse_bare_text(raw: &str) -> Vec<RawCue> {
    let lower = raw.to_lowercase();
    if lower.contains("<html") || lower.contains("<!doctype") {
        // An HTML document is an error page, not a cue list.
        return Vec::new();
    }

    const SYNTH_CUE_SECS: f64 = 5.0;

    raw.lines()
        .map(decode_text)
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(index, text)| RawCue {
            text,
            start: index as f64 * SYNTH_CUE_SECS,
            duration: SYNTH_CUE_SECS,
        })
        .collect()
}

fn timed_cue(start: &str, duration: &str, body: &str) -> Option<RawCue> {
    let text = decode_text(body);
    if text.is_empty() {
        return None;
    }
    Some(RawCue {
        text,
        start: start.parse().ok()?,
        duration: duration.parse().unwrap_or(0.0),
    })
}

/// Decode caption body text: strip inline markup, un-escape the standard
/// character entities, collapse internal whitespace, and trim.
pub fn decode_text(raw: &str) -> String {
    let stripped = INLINE_TAG.replace_all(raw, " ");
    // `&amp;` is decoded last so double-escaped entities resolve one level only.
    let decoded = stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#47;", "/")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
