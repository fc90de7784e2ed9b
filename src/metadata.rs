//! Client for the title/episode metadata service.
//!
//! Two plain request/response calls: search titles by free-text query, list a
//! title's episodes. Results feed the warp-target resolver
//! ([`crate::warp_target`]), which only reads the release dates; everything
//! else is carried through for display. No caching here; the only cache in
//! the crate is the subreddit name directory.

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::client::FetchError;
use crate::config::MetadataConfig;

/// Candidates returned per title search.
const SEARCH_LIMIT: usize = 10;

/// A ranked title candidate from free-text search.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub id: String,
    #[serde(default)]
    pub primary_title: Option<String>,
    #[serde(rename = "type", default)]
    pub title_type: Option<String>,
    /// Release year; absent for unreleased or undated titles.
    #[serde(default)]
    pub start_year: Option<i32>,
}

/// A possibly partial calendar date. Month and day may be missing for titles
/// the service only knows the year of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReleaseDate {
    pub year: i32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

/// One episode of a series, in season/episode order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Season label as the service reports it (usually a number, not always).
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub episode_number: Option<i64>,
    #[serde(default)]
    pub release_date: Option<ReleaseDate>,
}

#[derive(Debug, Deserialize)]
struct SearchTitlesResponse {
    #[serde(default)]
    titles: Vec<Title>,
}

#[derive(Debug, Deserialize)]
struct ListEpisodesResponse {
    #[serde(default)]
    episodes: Vec<Episode>,
}

/// Client for the metadata-lookup service.
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
}

impl MetadataClient {
    pub fn new(config: &MetadataConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search titles by free-text query, ranked by the service.
    pub async fn search_titles(&self, query: &str) -> Result<Vec<Title>, FetchError> {
        let url = format!("{}/search/titles", self.base_url);
        debug!(%query, "searching titles");
        let response = self
            .http
            .get(&url)
            .query(&[("query", query), ("limit", &SEARCH_LIMIT.to_string())])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let body: SearchTitlesResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(body.titles)
    }

    /// List a title's episodes in season/episode order.
    pub async fn list_episodes(&self, title_id: &str) -> Result<Vec<Episode>, FetchError> {
        let url = format!("{}/titles/{}/episodes", self.base_url, title_id);
        debug!(%title_id, "listing episodes");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FetchError::Http {
                status: status.as_u16(),
                detail,
            });
        }

        let body: ListEpisodesResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(body.episodes)
    }
}
