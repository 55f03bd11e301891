use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::metadata::{MetadataSource, OembedSource, VideoMetadata};
use crate::resolver::{self, VideoId};
use crate::segments::{self, TranscriptSegment};
use crate::strategies::{StrategyChain, TranscriptStrategy};
use crate::ExtractError;

/// Everything extracted for one video: metadata plus transcript.
///
/// `full_transcript` is always non-empty once a video resolves: either the
/// combined segment text, or a synthesized placeholder when `transcript` is
/// empty. Downstream consumers treat the placeholder as ordinary transcript
/// text, so it reads as prose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub video_id: VideoId,
    pub url: String,
    pub metadata: VideoMetadata,
    pub transcript: Vec<TranscriptSegment>,
    pub full_transcript: String,
    pub extracted_at: DateTime<Utc>,
}

/// Public entry point: runs the metadata lookup and the strategy chain
/// concurrently and merges the results.
pub struct ContentExtractor {
    chain: StrategyChain,
    metadata_source: Box<dyn MetadataSource>,
    metadata_timeout: Duration,
    transcript_deadline: Duration,
}

impl ContentExtractor {
    pub fn new(config: &Config) -> Result<Self, ExtractError> {
        let client = Self::build_client(config)?;
        let chain = StrategyChain::with_defaults(
            client.clone(),
            config.extraction.languages.clone(),
            Duration::from_millis(config.extraction.attempt_delay_ms),
        );
        Ok(Self::assemble(
            config,
            chain,
            Box::new(OembedSource::new(client)),
        ))
    }

    /// Build an extractor with an explicit strategy list and the default
    /// oEmbed metadata source.
    pub fn with_strategies(
        config: &Config,
        strategies: Vec<Box<dyn TranscriptStrategy>>,
    ) -> Result<Self, ExtractError> {
        let client = Self::build_client(config)?;
        Ok(Self::with_sources(
            config,
            strategies,
            Box::new(OembedSource::new(client)),
        ))
    }

    /// Build an extractor with explicit strategy and metadata sources. Used
    /// by tests and by callers that need full control over both branches.
    pub fn with_sources(
        config: &Config,
        strategies: Vec<Box<dyn TranscriptStrategy>>,
        metadata_source: Box<dyn MetadataSource>,
    ) -> Self {
        let chain = StrategyChain::new(
            strategies,
            Duration::from_millis(config.extraction.attempt_delay_ms),
        );
        Self::assemble(config, chain, metadata_source)
    }

    fn build_client(config: &Config) -> Result<reqwest::Client, ExtractError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_secs))
            .build()
            .map_err(|err| ExtractError::Infrastructure(err.to_string()))
    }

    fn assemble(
        config: &Config,
        chain: StrategyChain,
        metadata_source: Box<dyn MetadataSource>,
    ) -> Self {
        Self {
            chain,
            metadata_source,
            metadata_timeout: Duration::from_secs(config.http.metadata_timeout_secs),
            transcript_deadline: Duration::from_secs(config.http.transcript_deadline_secs),
        }
    }

    /// Strategy names in the order they will be tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.chain.names()
    }

    /// Extract metadata and transcript for an arbitrary input string.
    ///
    /// Fails fast with `InvalidFormat` before any network access. Transcript
    /// failures of any class are absorbed into a placeholder `full_transcript`;
    /// metadata failures are absorbed by the retriever itself. Either branch
    /// may complete first; the merge waits for both.
    pub async fn extract(&self, input: &str) -> Result<ExtractedContent, ExtractError> {
        let id = resolver::resolve(input)?;
        tracing::info!("Resolved {:?} to video id {}", input, id);

        let metadata_branch = async {
            match tokio::time::timeout(self.metadata_timeout, self.metadata_source.fetch(&id)).await
            {
                Ok(metadata) => metadata,
                Err(_) => {
                    tracing::warn!("Metadata fetch timed out for {}", id);
                    VideoMetadata::placeholder(&id)
                }
            }
        };

        let transcript_branch = async {
            match tokio::time::timeout(self.transcript_deadline, self.chain.run(&id)).await {
                Ok(result) => result,
                Err(_) => Err(ExtractError::Timeout(self.transcript_deadline.as_secs())),
            }
        };

        let (metadata, transcript) = tokio::join!(metadata_branch, transcript_branch);

        let (transcript, full_transcript) = match transcript {
            Ok(segments) => {
                let full = segments::combine(&segments);
                (segments, full)
            }
            Err(err) => {
                tracing::warn!("Transcript acquisition failed for {}: {}", id, err);
                (Vec::new(), placeholder_transcript(&id, &metadata, &err))
            }
        };

        Ok(ExtractedContent {
            url: id.watch_url(),
            video_id: id,
            metadata,
            transcript,
            full_transcript,
            extracted_at: Utc::now(),
        })
    }
}

/// Synthesize the placeholder transcript used when no captions could be
/// obtained. Consumed downstream as ordinary transcript text, so it reads as
/// prose: what happened, which video this is, and how to proceed manually.
fn placeholder_transcript(id: &VideoId, metadata: &VideoMetadata, err: &ExtractError) -> String {
    let reason = match err {
        ExtractError::NoCaptionsAvailable => {
            "No transcript is available for this video: captions are disabled or were never published by the uploader."
        }
        _ => {
            "A transcript could not be retrieved for this video right now due to a temporary technical problem; trying again in a few minutes may succeed."
        }
    };

    format!(
        "{} The video \"{}\" by {} (duration: {}) was found and its details were loaded. \
         To continue working with this video: \
         1. Open {} in your browser. \
         2. If the transcript panel is available below the player, open it and copy the text. \
         3. Paste the copied text using the manual transcript input. \
         4. If no transcript panel exists, write a short summary of the video to use in its place.",
        reason, metadata.title, metadata.author, metadata.duration, id.watch_url()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captions::{self, RawCue};
    use crate::config::Config;
    use crate::strategies::TranscriptStrategy;
    use crate::Result;
    use async_trait::async_trait;

    struct StubStrategy {
        result: std::result::Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl TranscriptStrategy for StubStrategy {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn attempt(&self, _id: &VideoId) -> Result<Vec<RawCue>> {
            match self.result {
                Ok(markup) => Ok(captions::parse_cues(markup)),
                Err(message) => anyhow::bail!("{}", message),
            }
        }
    }

    /// Strategy that never answers within any test deadline.
    struct StalledStrategy;

    #[async_trait]
    impl TranscriptStrategy for StalledStrategy {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn attempt(&self, _id: &VideoId) -> Result<Vec<RawCue>> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            anyhow::bail!("unreachable")
        }
    }

    struct StubMetadata {
        delay: Option<Duration>,
    }

    #[async_trait]
    impl MetadataSource for StubMetadata {
        async fn fetch(&self, id: &VideoId) -> VideoMetadata {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            VideoMetadata {
                title: "Stub Video".to_string(),
                author: "Stub Channel".to_string(),
                duration: "1:23".to_string(),
                views: None,
                upload_date: None,
                description: None,
                thumbnails: vec![id.thumbnail_url()],
            }
        }
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        // Both branches run against stubs; keep every timeout tight so a
        // regression that reintroduces waiting shows up as a slow test.
        config.http.metadata_timeout_secs = 1;
        config.http.request_timeout_secs = 1;
        config.extraction.attempt_delay_ms = 1;
        config
    }

    fn extractor(strategies: Vec<Box<dyn TranscriptStrategy>>) -> ContentExtractor {
        ContentExtractor::with_sources(
            &test_config(),
            strategies,
            Box::new(StubMetadata { delay: None }),
        )
    }

    #[tokio::test]
    async fn test_invalid_input_fails_fast() {
        let extractor = extractor(vec![]);
        assert!(matches!(
            extractor.extract("definitely not a video").await,
            Err(ExtractError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let extractor = extractor(vec![Box::new(StubStrategy {
            result: Ok(concat!(
                r#"<text start="0.0" dur="2.5">Hello &amp; welcome</text>"#,
                r#"<text start="2.5" dur="1.5">to the show</text>"#,
            )),
        })]);

        let content = extractor
            .extract("https://example.com/watch?v=abcDEF12345")
            .await
            .unwrap();

        assert_eq!(content.video_id.as_str(), "abcDEF12345");
        assert_eq!(content.url, "https://www.youtube.com/watch?v=abcDEF12345");
        assert_eq!(content.transcript.len(), 2);
        assert_eq!(content.full_transcript, "Hello & welcome to the show");
        assert_eq!(content.transcript[0].offset_ms, 0);
        assert_eq!(content.transcript[1].offset_ms, 2500);
    }

    #[tokio::test]
    async fn test_captions_disabled_placeholder() {
        let extractor = extractor(vec![
            Box::new(StubStrategy {
                result: Err("upstream says: captions disabled for this video"),
            }),
            Box::new(StubStrategy {
                result: Err("connection reset by peer"),
            }),
        ]);

        let content = extractor.extract("dQw4w9WgXcQ").await.unwrap();

        assert!(content.transcript.is_empty());
        assert!(content.full_transcript.contains("captions are disabled"));
        assert!(!content.full_transcript.contains("technical problem"));
        // Metadata values are echoed into the placeholder text.
        assert!(content.full_transcript.contains("Stub Video"));
        assert!(content.full_transcript.contains("Stub Channel"));
    }

    #[tokio::test]
    async fn test_deadline_expiry_yields_technical_placeholder() {
        let mut config = test_config();
        config.http.transcript_deadline_secs = 1;
        let extractor = ContentExtractor::with_sources(
            &config,
            vec![Box::new(StalledStrategy)],
            Box::new(StubMetadata { delay: None }),
        );

        let content = extractor.extract("dQw4w9WgXcQ").await.unwrap();

        assert!(content.transcript.is_empty());
        assert!(content.full_transcript.contains("technical problem"));
        assert!(!content.full_transcript.contains("captions are disabled"));
        assert!(content.full_transcript.contains("Stub Video"));
    }

    #[tokio::test]
    async fn test_metadata_timeout_falls_back_to_placeholder() {
        let extractor = ContentExtractor::with_sources(
            &test_config(),
            vec![Box::new(StubStrategy {
                result: Ok(r#"<text start="0.0" dur="1.0">hi there</text>"#),
            })],
            Box::new(StubMetadata {
                delay: Some(Duration::from_secs(30)),
            }),
        );

        let content = extractor.extract("dQw4w9WgXcQ").await.unwrap();

        assert_eq!(
            content.metadata,
            VideoMetadata::placeholder(&content.video_id)
        );
        // The transcript branch is unaffected by the metadata stall.
        assert_eq!(content.full_transcript, "hi there");
    }

    #[tokio::test]
    async fn test_technical_failure_placeholder() {
        let extractor = extractor(vec![Box::new(StubStrategy {
            result: Err("HTTP 503 from upstream"),
        })]);

        let content = extractor.extract("dQw4w9WgXcQ").await.unwrap();

        assert!(content.transcript.is_empty());
        assert!(content.full_transcript.contains("technical problem"));
        assert!(!content.full_transcript.contains("captions are disabled"));
        assert!(content.full_transcript.contains(content.video_id.as_str()));
    }

    #[test]
    fn test_empty_chain_reports_exhaustion_in_band() {
        tokio_test::block_on(async {
            let extractor = extractor(vec![]);
            let content = extractor.extract("dQw4w9WgXcQ").await.unwrap();
            assert!(content.transcript.is_empty());
            assert!(!content.full_transcript.is_empty());
        });
    }

    #[test]
    fn test_wire_shape() {
        let content = ExtractedContent {
            video_id: resolver::resolve("dQw4w9WgXcQ").unwrap(),
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            metadata: VideoMetadata::placeholder(&resolver::resolve("dQw4w9WgXcQ").unwrap()),
            transcript: vec![TranscriptSegment {
                text: "hi".to_string(),
                offset_ms: 0,
                duration_ms: 1000,
            }],
            full_transcript: "hi".to_string(),
            extracted_at: Utc::now(),
        };

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["video_id"], "dQw4w9WgXcQ");
        assert_eq!(json["transcript"][0]["offset"], 0);
        assert_eq!(json["transcript"][0]["duration"], 1000);
        assert_eq!(json["metadata"]["title"], "Unknown Title");
    }
}
