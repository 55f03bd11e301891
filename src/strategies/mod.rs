use async_trait::async_trait;
use std::time::Duration;

use crate::captions::RawCue;
use crate::resolver::VideoId;
use crate::segments::{self, TimingUnits, TranscriptSegment};
use crate::{ExtractError, Result};

pub mod innertube;
pub mod timedtext;
pub mod watch_page;

/// One self-contained method of obtaining timed captions for a video.
///
/// Implementations own their transport and wire-format details; the chain
/// executor only sees raw cues and the declared timing units.
#[async_trait]
pub trait TranscriptStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Units the raw cues are expressed in. Declared, never inferred.
    fn timing_units(&self) -> TimingUnits {
        TimingUnits::Seconds
    }

    async fn attempt(&self, id: &VideoId) -> Result<Vec<RawCue>>;
}

/// Outcome of a single strategy attempt. Created fresh per attempt and
/// consumed immediately by the executor.
#[derive(Debug)]
pub enum StrategyOutcome {
    Success(Vec<TranscriptSegment>),
    Empty,
    Failure { class: FailureClass, detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Upstream confirmed the video has no captions at all
    NoCaptions,
    /// Transport problem or an extraction bug; possibly transient
    Transport,
}

// Upstream failure messages are free text. Classification is table-driven so
// new phrasings can be added without touching executor logic.
const NO_CAPTIONS_SIGNALS: &[&str] = &[
    "captions are disabled",
    "captions disabled",
    "transcript is disabled",
    "transcripts disabled",
    "no caption tracks",
    "no captions",
    "subtitles are disabled",
];

pub fn classify_failure(detail: &str) -> FailureClass {
    let lower = detail.to_lowercase();
    if NO_CAPTIONS_SIGNALS.iter().any(|signal| lower.contains(signal)) {
        FailureClass::NoCaptions
    } else {
        FailureClass::Transport
    }
}

/// Failure record kept for diagnostics while the chain proceeds.
#[derive(Debug)]
struct RecordedFailure {
    index: usize,
    strategy: &'static str,
    class: FailureClass,
    detail: String,
}

/// Runs an ordered list of strategies, stopping at the first one producing a
/// non-empty normalized segment sequence.
///
/// Strategies run strictly sequentially; ordering reflects decreasing
/// historical reliability, and stopping at first success avoids unnecessary
/// load on less-preferred transports.
pub struct StrategyChain {
    strategies: Vec<Box<dyn TranscriptStrategy>>,
    attempt_delay: Duration,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Box<dyn TranscriptStrategy>>, attempt_delay: Duration) -> Self {
        Self {
            strategies,
            attempt_delay,
        }
    }

    /// Default chain in decreasing order of historical reliability.
    pub fn with_defaults(
        client: reqwest::Client,
        languages: Vec<String>,
        attempt_delay: Duration,
    ) -> Self {
        Self::new(
            vec![
                Box::new(timedtext::TimedTextStrategy::new(client.clone(), languages.clone())),
                Box::new(innertube::InnerTubeStrategy::new(client.clone(), languages.clone())),
                Box::new(watch_page::WatchPageStrategy::new(client, languages)),
            ],
            attempt_delay,
        )
    }

    /// Strategy names in the order they are tried
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    /// Try each strategy in order. A strategy succeeds only if it yields at
    /// least one segment with non-empty text after normalization; empty or
    /// failing results are recorded and the chain proceeds. The inter-attempt
    /// delay runs only between attempts, never after the last one.
    pub async fn run(&self, id: &VideoId) -> std::result::Result<Vec<TranscriptSegment>, ExtractError> {
        let mut failures: Vec<RecordedFailure> = Vec::new();

        for (index, strategy) in self.strategies.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.attempt_delay).await;
            }

            tracing::debug!("Trying strategy {} ({})", index, strategy.name());

            let outcome = match strategy.attempt(id).await {
                Ok(cues) => {
                    let normalized = segments::normalize(cues, strategy.timing_units());
                    if normalized.is_empty() {
                        StrategyOutcome::Empty
                    } else {
                        StrategyOutcome::Success(normalized)
                    }
                }
                Err(err) => {
                    let detail = format!("{:#}", err);
                    StrategyOutcome::Failure {
                        class: classify_failure(&detail),
                        detail,
                    }
                }
            };

            match outcome {
                StrategyOutcome::Success(normalized) => {
                    tracing::info!(
                        "Strategy {} produced {} segments for {}",
                        strategy.name(),
                        normalized.len(),
                        id
                    );
                    return Ok(normalized);
                }
                StrategyOutcome::Empty => {
                    tracing::warn!("Strategy {} returned no usable cues for {}", strategy.name(), id);
                    failures.push(RecordedFailure {
                        index,
                        strategy: strategy.name(),
                        class: FailureClass::Transport,
                        detail: "returned no usable cues".to_string(),
                    });
                }
                StrategyOutcome::Failure { class, detail } => {
                    tracing::warn!("Strategy {} failed for {}: {}", strategy.name(), id, detail);
                    failures.push(RecordedFailure {
                        index,
                        strategy: strategy.name(),
                        class,
                        detail,
                    });
                }
            }
        }

        for failure in &failures {
            tracing::debug!(
                "strategy[{}] {} -> {:?}: {}",
                failure.index,
                failure.strategy,
                failure.class,
                failure.detail
            );
        }

        // Any no-captions signal anywhere in the chain means the video simply
        // has no captions; later unrelated failures do not mask that.
        if failures.iter().any(|failure| failure.class == FailureClass::NoCaptions) {
            Err(ExtractError::NoCaptionsAvailable)
        } else {
            Err(ExtractError::ExtractionExhausted {
                attempted: self.strategies.len(),
            })
        }
    }
}
