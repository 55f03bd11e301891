//! Vidscribe - extract timed-caption transcripts and metadata from YouTube videos
//!
//! This library resolves a video URL or bare id to a canonical identifier, then
//! runs an ordered chain of caption extraction strategies alongside a best-effort
//! metadata lookup. The caller always receives a well-formed [`ExtractedContent`]:
//! when no captions can be obtained the transcript field carries a human-readable
//! placeholder instead of an error.

pub mod captions;
pub mod cli;
pub mod config;
pub mod extract;
pub mod metadata;
pub mod output;
pub mod resolver;
pub mod segments;
pub mod strategies;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extract::{ContentExtractor, ExtractedContent};
pub use metadata::VideoMetadata;
pub use resolver::VideoId;
pub use segments::TranscriptSegment;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Errors surfaced to callers of the extraction facade.
///
/// Transcript-specific failures (`NoCaptionsAvailable`, `ExtractionExhausted`,
/// `Timeout`) never escape [`ContentExtractor::extract`]; they are absorbed into
/// the placeholder transcript. Only `InvalidFormat` and `Infrastructure` reach
/// the caller as hard errors.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("Unrecognized video URL or id: {0}")]
    InvalidFormat(String),

    #[error("No captions are available for this video")]
    NoCaptionsAvailable,

    #[error("All {attempted} transcript strategies failed")]
    ExtractionExhausted { attempted: usize },

    #[error("Transcript extraction exceeded the {0}s deadline")]
    Timeout(u64),

    #[error("Transport infrastructure failure: {0}")]
    Infrastructure(String),
}
