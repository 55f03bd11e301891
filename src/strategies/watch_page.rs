use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::TranscriptStrategy;
use crate::captions::{self, RawCue};
use crate::resolver::VideoId;
use crate::Result;

static CAPTION_TRACKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""captionTracks":(\[.*?\])"#).unwrap());

/// Scrapes the caption track list straight out of the watch-page HTML.
///
/// Least preferred: the embedded player config moves around between page
/// revisions. Kept as the final fallback because it needs no API key and no
/// second origin.
pub struct WatchPageStrategy {
    client: reqwest::Client,
    languages: Vec<String>,
}

impl WatchPageStrategy {
    pub fn new(client: reqwest::Client, languages: Vec<String>) -> Self {
        Self { client, languages }
    }

    async fn fetch_html(&self, id: &VideoId) -> Result<String> {
        let response = self
            .client
            .get(id.watch_url())
            .send()
            .await
            .context("watch page request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("watch page returned HTTP {}", response.status());
        }

        response.text().await.context("failed to read watch page body")
    }

    /// Pull the `captionTracks` array out of the page markup and pick a track
    /// URL, preferring the configured languages.
    fn select_track_url(&self, html: &str) -> Result<String> {
        let fragment = CAPTION_TRACKS_RE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .context("no caption tracks found in watch page markup")?;

        let tracks: Vec<Value> = serde_json::from_str(fragment.as_str())
            .context("caption track list was not valid JSON")?;
        if tracks.is_empty() {
            anyhow::bail!("no caption tracks found in watch page markup");
        }

        let base_url = |track: &Value| -> Option<String> {
            track
                .get("baseUrl")
                .and_then(|url| url.as_str())
                // JSON string un-escaping covers & already; srv3 is
                // stripped so the track serves the plain XML shape.
                .map(|url| url.replace("&fmt=srv3", ""))
        };

        for lang in &self.languages {
            if let Some(url) = tracks
                .iter()
                .find(|track| {
                    track
                        .get("languageCode")
                        .and_then(|code| code.as_str())
                        .map(|code| code.starts_with(lang.as_str()))
                        .unwrap_or(false)
                })
                .and_then(&base_url)
            {
                return Ok(url);
            }
        }

        tracks
            .iter()
            .find_map(base_url)
            .context("caption tracks carried no usable baseUrl")
    }

    async fn fetch_track(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("caption track request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("caption track returned HTTP {}", response.status());
        }

        response.text().await.context("failed to read caption track body")
    }
}

#[async_trait]
impl TranscriptStrategy for WatchPageStrategy {
    fn name(&self) -> &'static str {
        "watch_page"
    }

    async fn attempt(&self, id: &VideoId) -> Result<Vec<RawCue>> {
        let html = self.fetch_html(id).await?;
        let track_url = self.select_track_url(&html)?;

        tracing::debug!("Fetching scraped caption track for {}", id);
        let body = self.fetch_track(&track_url).await?;

        let cues = captions::parse_cues(&body);
        if cues.is_empty() {
            anyhow::bail!("caption track body contained no cues");
        }
        Ok(cues)
    }
}
