use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ExtractError;

/// Canonical 11-character video identifier.
///
/// Produced only by [`resolve`]; once constructed the token is known to match
/// the accepted surface syntax and can be trusted downstream without further
/// validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch-page URL for this id
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Thumbnail URL derived deterministically from the id alone
    pub fn thumbnail_url(&self) -> String {
        format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Accepted surface syntaxes, tried in priority order. The watch-URL pattern is
// host-agnostic: upstream mirrors and redirectors reuse the same query shape.
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Watch URL: watch?v=ID (possibly with other query parameters first)
        r"watch\?(?:[^#\s]*&)?v=([A-Za-z0-9_-]{11})",
        // Short link: youtu.be/ID
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        // Embed URL: /embed/ID
        r"/embed/([A-Za-z0-9_-]{11})",
        // Shorts URL: /shorts/ID
        r"/shorts/([A-Za-z0-9_-]{11})",
        // Bare 11-character token
        r"^([A-Za-z0-9_-]{11})$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Resolve an arbitrary input string into a canonical [`VideoId`].
///
/// Pure function, no network access. Patterns are applied in a fixed priority
/// order and the first match wins.
pub fn resolve(input: &str) -> Result<VideoId, ExtractError> {
    let input = input.trim();

    for pattern in PATTERNS.iter() {
        if let Some(caps) = pattern.captures(input) {
            return Ok(VideoId(caps[1].to_string()));
        }
    }

    Err(ExtractError::InvalidFormat(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_video_id() {
        assert_eq!(resolve("dQw4w9WgXcQ").unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_all_surface_forms_agree() {
        let inputs = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?t=42&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "dQw4w9WgXcQ",
        ];
        for input in inputs {
            assert_eq!(resolve(input).unwrap().as_str(), "dQw4w9WgXcQ", "input: {}", input);
        }
    }

    #[test]
    fn test_host_agnostic_watch_url() {
        assert_eq!(
            resolve("https://example.com/watch?v=abcDEF12345").unwrap().as_str(),
            "abcDEF12345"
        );
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(resolve("  dQw4w9WgXcQ  ").unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_invalid_inputs() {
        for input in ["", "short", "not-a-valid-id", "https://example.com", "dQw4w9WgXc!", "ватафак1234"] {
            assert!(
                matches!(resolve(input), Err(ExtractError::InvalidFormat(_))),
                "input should be rejected: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_canonical_urls() {
        let id = resolve("dQw4w9WgXcQ").unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(id.thumbnail_url(), "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg");
    }
}
