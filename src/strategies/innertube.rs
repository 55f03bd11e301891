use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::TranscriptStrategy;
use crate::captions::{self, RawCue};
use crate::resolver::VideoId;
use crate::Result;

const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player?key=";

static API_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([A-Za-z0-9_-]+)""#).unwrap());

/// Queries the InnerTube player API for the caption track list.
///
/// The API key is scraped from the watch page, then the player endpoint is
/// called with an Android client context, which still serves plain caption
/// URLs. This is the only strategy that can authoritatively distinguish
/// "captions disabled" from a transport failure.
pub struct InnerTubeStrategy {
    client: reqwest::Client,
    languages: Vec<String>,
}

impl InnerTubeStrategy {
    pub fn new(client: reqwest::Client, languages: Vec<String>) -> Self {
        Self { client, languages }
    }

    async fn fetch_watch_html(&self, id: &VideoId) -> Result<String> {
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

    fn extract_api_key(html: &str) -> Result<String> {
        API_KEY_RE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|key| key.as_str().to_string())
            .context("INNERTUBE_API_KEY not found in watch page markup")
    }

    async fn fetch_player_data(&self, id: &VideoId, api_key: &str) -> Result<Value> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": id.as_str()
        });

        let response = self
            .client
            .post(format!("{}{}", PLAYER_URL, api_key))
            .json(&body)
            .send()
            .await
            .context("player API request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("player API returned HTTP {}", response.status());
        }

        response
            .json()
            .await
            .context("failed to parse player API response")
    }

    /// Pick a caption track URL: preferred language first, manually created
    /// tracks over auto-generated ("asr") within a language, first listed
    /// track as a last resort.
    fn select_track_url(&self, data: &Value) -> Result<String> {
        let renderer = data
            .pointer("/captions/playerCaptionsTracklistRenderer")
            .context("captions are disabled on this video")?;

        let tracks = renderer
            .get("captionTracks")
            .and_then(|tracks| tracks.as_array())
            .filter(|tracks| !tracks.is_empty())
            .context("no caption tracks listed for this video")?;

        let base_url = |track: &Value| -> Option<String> {
            track
                .get("baseUrl")
                .and_then(|url| url.as_str())
                .map(|url| url.replace("&fmt=srv3", ""))
        };
        fn lang_code(track: &Value) -> &str {
            track.get("languageCode").and_then(|code| code.as_str()).unwrap_or("")
        }
        let is_generated = |track: &Value| -> bool {
            track
                .get("kind")
                .and_then(|kind| kind.as_str())
                .map(|kind| kind == "asr")
                .unwrap_or(false)
        };

        for lang in &self.languages {
            if let Some(track) = tracks
                .iter()
                .find(|track| lang_code(track).starts_with(lang.as_str()) && !is_generated(track))
            {
                if let Some(url) = base_url(track) {
                    return Ok(url);
                }
            }
            if let Some(track) = tracks.iter().find(|track| lang_code(track).starts_with(lang.as_str())) {
                if let Some(url) = base_url(track) {
                    return Ok(url);
                }
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
impl TranscriptStrategy for InnerTubeStrategy {
    fn name(&self) -> &'static str {
        "innertube"
    }

    async fn attempt(&self, id: &VideoId) -> Result<Vec<RawCue>> {
        let html = self.fetch_watch_html(id).await?;
        let api_key = Self::extract_api_key(&html)?;

        tracing::debug!("Querying InnerTube player API for {}", id);
        let data = self.fetch_player_data(id, &api_key).await?;

        let track_url = self.select_track_url(&data)?;
        let body = self.fetch_track(&track_url).await?;

        let cues = captions::parse_cues(&body);
        if cues.is_empty() {
            anyhow::bail!("caption track body contained no cues");
        }
        Ok(cues)
    }
}
