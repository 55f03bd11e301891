use serde::{Deserialize, Serialize};

use crate::captions::RawCue;

/// Timing units a strategy declares for its raw cues.
///
/// Declared per strategy, never inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingUnits {
    Seconds,
    Millis,
}

/// Canonical timed transcript segment.
///
/// Within one transcript, segments are ordered by non-decreasing `offset_ms`.
/// Adjacent segments may overlap; upstream timing is approximate and no
/// deduplication is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,

    /// Offset from the start of the video in milliseconds
    #[serde(rename = "offset")]
    pub offset_ms: u64,

    /// Display duration in milliseconds
    #[serde(rename = "duration")]
    pub duration_ms: u64,
}

/// Convert raw cues into canonical segments: unit conversion, empty-text drop,
/// and a stable sort by offset.
pub fn normalize(cues: Vec<RawCue>, units: TimingUnits) -> Vec<TranscriptSegment> {
    let to_millis = |value: f64| -> u64 {
        let millis = match units {
            TimingUnits::Seconds => value * 1000.0,
            TimingUnits::Millis => value,
        };
        if millis.is_finite() && millis > 0.0 {
            millis.round() as u64
        } else {
            0
        }
    };

    let mut segments: Vec<TranscriptSegment> = cues
        .into_iter()
        .filter_map(|cue| {
            let text = cue.text.trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptSegment {
                text,
                offset_ms: to_millis(cue.start),
                duration_ms: to_millis(cue.duration),
            })
        })
        .collect();

    // Stable: cues sharing an offset keep their upstream order.
    segments.sort_by_key(|segment| segment.offset_ms);
    segments
}

/// Concatenate segment texts with single spaces, collapsing repeated
/// whitespace. Idempotent: combining the combiner's own output again yields
/// the same string.
pub fn combine(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .flat_map(|segment| segment.text.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(text: &str, start: f64, duration: f64) -> RawCue {
        RawCue {
            text: text.to_string(),
            start,
            duration,
        }
    }

    #[test]
    fn test_normalize_seconds_to_millis() {
        let segments = normalize(vec![cue("hi", 1.5, 2.0)], TimingUnits::Seconds);
        assert_eq!(segments[0].offset_ms, 1500);
        assert_eq!(segments[0].duration_ms, 2000);
    }

    #[test]
    fn test_normalize_millis_passthrough() {
        let segments = normalize(vec![cue("hi", 1500.0, 2000.0)], TimingUnits::Millis);
        assert_eq!(segments[0].offset_ms, 1500);
        assert_eq!(segments[0].duration_ms, 2000);
    }

    #[test]
    fn test_normalize_sorts_by_offset() {
        let segments = normalize(
            vec![cue("b", 5.0, 1.0), cue("a", 1.0, 1.0), cue("c", 9.0, 1.0)],
            TimingUnits::Seconds,
        );
        let offsets: Vec<u64> = segments.iter().map(|s| s.offset_ms).collect();
        assert_eq!(offsets, vec![1000, 5000, 9000]);
        assert!(segments.windows(2).all(|w| w[0].offset_ms <= w[1].offset_ms));
    }

    #[test]
    fn test_normalize_drops_empty_text() {
        let segments = normalize(
            vec![cue("  ", 0.0, 1.0), cue("kept", 1.0, 1.0)],
            TimingUnits::Seconds,
        );
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "kept");
    }

    #[test]
    fn test_normalize_negative_timing_clamped() {
        let segments = normalize(vec![cue("hi", -1.0, -2.0)], TimingUnits::Seconds);
        assert_eq!(segments[0].offset_ms, 0);
        assert_eq!(segments[0].duration_ms, 0);
    }

    #[test]
    fn test_combine_joins_with_single_spaces() {
        let segments = normalize(
            vec![cue("Hello  there", 0.0, 1.0), cue(" general\nKenobi ", 1.0, 1.0)],
            TimingUnits::Seconds,
        );
        assert_eq!(combine(&segments), "Hello there general Kenobi");
    }

    #[test]
    fn test_combine_idempotent() {
        let segments = normalize(
            vec![cue("one two", 0.0, 1.0), cue("three", 1.0, 1.0)],
            TimingUnits::Seconds,
        );
        let first = combine(&segments);
        let rerun = normalize(
            vec![RawCue {
                text: first.clone(),
                start: 0.0,
                duration: 0.0,
            }],
            TimingUnits::Seconds,
        );
        assert_eq!(combine(&rerun), first);
    }

    #[test]
    fn test_combine_empty() {
        assert_eq!(combine(&[]), "");
    }
}
