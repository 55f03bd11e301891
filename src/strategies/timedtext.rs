use anyhow::Context;
use async_trait::async_trait;

use super::TranscriptStrategy;
use crate::captions::{self, RawCue};
use crate::resolver::VideoId;
use crate::Result;

const TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";

/// Fetches caption XML from the public timedtext endpoint.
///
/// The endpoint needs no API key and answers HTTP 200 with an empty body when
/// no track exists for the requested language, so emptiness is not proof that
/// captions are disabled; later strategies make that call.
pub struct TimedTextStrategy {
    client: reqwest::Client,
    languages: Vec<String>,
}

impl TimedTextStrategy {
    pub fn new(client: reqwest::Client, languages: Vec<String>) -> Self {
        Self { client, languages }
    }

    async fn fetch_track(&self, id: &VideoId, lang: &str) -> Result<String> {
        let url = format!("{}?v={}&lang={}", TIMEDTEXT_URL, id, lang);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("timedtext request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("timedtext endpoint returned HTTP {}", response.status());
        }

        response.text().await.context("failed to read timedtext body")
    }
}

#[async_trait]
impl TranscriptStrategy for TimedTextStrategy {
    fn name(&self) -> &'static str {
        "timedtext"
    }

    async fn attempt(&self, id: &VideoId) -> Result<Vec<RawCue>> {
        for lang in &self.languages {
            tracing::debug!("Fetching timedtext track for {} ({})", id, lang);

            let body = self.fetch_track(id, lang).await?;
            if body.trim().is_empty() {
                continue;
            }

            let cues = captions::parse_cues(&body);
            if !cues.is_empty() {
                return Ok(cues);
            }
        }

        anyhow::bail!("timedtext returned no parseable cues for any preferred language")
    }
}
