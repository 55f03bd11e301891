use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::resolver::VideoId;
use crate::Result;

const OEMBED_URL: &str = "https://www.youtube.com/oembed";

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_DURATION: &str = "Unknown";

/// Descriptive video metadata.
///
/// All fields are optional-safe: a failed lookup substitutes "Unknown" values
/// and a deterministic thumbnail, never a missing struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub author: String,
    pub duration: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub thumbnails: Vec<String>,
}

impl VideoMetadata {
    /// Placeholder value substituted whenever the lookup fails. The thumbnail
    /// is derived from the id alone, so it is always present.
    pub fn placeholder(id: &VideoId) -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            duration: UNKNOWN_DURATION.to_string(),
            views: None,
            upload_date: None,
            description: None,
            thumbnails: vec![id.thumbnail_url()],
        }
    }
}

/// Source of descriptive metadata.
///
/// The production implementation talks to the oEmbed endpoint; tests
/// substitute stubs so the facade never touches the network.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self, id: &VideoId) -> VideoMetadata;
}

/// Default source backed by the oEmbed endpoint
pub struct OembedSource {
    client: reqwest::Client,
}

impl OembedSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataSource for OembedSource {
    async fn fetch(&self, id: &VideoId) -> VideoMetadata {
        fetch(&self.client, id).await
    }
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: Option<String>,
    author_name: Option<String>,
    thumbnail_url: Option<String>,
}

/// Fetch descriptive metadata for a video.
///
/// Never fails: any transport or parse error is logged and converted into
/// placeholder metadata. Best-effort enrichment only, so there are no retries.
pub async fn fetch(client: &reqwest::Client, id: &VideoId) -> VideoMetadata {
    match fetch_oembed(client, id).await {
        Ok(metadata) => metadata,
        Err(err) => {
            tracing::warn!("Metadata lookup failed for {}: {:#}", id, err);
            VideoMetadata::placeholder(id)
        }
    }
}

async fn fetch_oembed(client: &reqwest::Client, id: &VideoId) -> Result<VideoMetadata> {
    let url = format!(
        "{}?url={}&format=json",
        OEMBED_URL,
        urlencoding::encode(&id.watch_url())
    );

    tracing::debug!("Fetching oEmbed metadata for {}", id);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("oEmbed endpoint returned HTTP {}", response.status());
    }

    let body: OembedResponse = response.json().await?;

    let mut thumbnails = Vec::new();
    if let Some(thumbnail) = body.thumbnail_url {
        thumbnails.push(thumbnail);
    }
    let derived = id.thumbnail_url();
    if !thumbnails.contains(&derived) {
        thumbnails.push(derived);
    }

    Ok(VideoMetadata {
        title: body.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        author: body.author_name.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        // oEmbed carries no duration field
        duration: UNKNOWN_DURATION.to_string(),
        views: None,
        upload_date: None,
        description: None,
        thumbnails,
    })
}
