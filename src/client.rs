//! HTTP client for the snapshot (historical data) service.
//!
//! Builds and issues the two read operations the service exposes per
//! subreddit (sorted submissions and hot submissions) plus the one-shot
//! subreddit listing used by the name cache. Each call is a single network
//! request; there is no caching and no automatic retry at this layer. A
//! failure surfaces immediately as a [`FetchError`] and the pagination
//! controller decides what to do with it.
//!
//! Endpoint shapes:
//!
//! ```text
//! GET {base}/subreddits
//! GET {base}/subreddits/{name}/{anchor}/submissions?sort_by=&limit=&skip=[&start_time=&end_time=]
//! GET {base}/subreddits/{name}/{anchor}/submissions/hot?limit=&skip=
//! ```
//!
//! The anchor timestamp is a path segment: the service materializes the whole
//! subreddit as of that instant and the query parameters only filter and page
//! within the snapshot.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::SnapshotConfig;
use crate::models::{PageRequest, SortMode, SubmissionsPage};
use crate::session::SessionState;
use crate::timerange::{self, TimeWindow};

/// Failure of a single HTTP fetch (snapshot or metadata service).
///
/// Owned strings only, so the pagination controller can hold the last error
/// in its state and the presentation layer can render it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The service answered with a non-success status.
    #[error("service returned {status}: {detail}")]
    Http { status: u16, detail: String },
    /// The request never completed (connect, timeout, TLS, ...).
    #[error("request failed: {0}")]
    Transport(String),
    /// The body did not match the expected envelope.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Build the page request for a session at a given offset.
///
/// This is where the time-range resolver is consulted: top-sort with a bounded
/// period gets an absolute `[start, end]` window attached; every other
/// combination sends no window parameters and lets the server default apply.
pub fn build_page_request(session: &SessionState, limit: usize, offset: usize) -> PageRequest {
    let window = session
        .bounded_period()
        .map(|period| timerange::resolve(period, session.anchor_timestamp));
    PageRequest {
        subreddit: session.subreddit.clone(),
        anchor_timestamp: session.anchor_timestamp,
        sort: session.sort,
        window,
        limit,
        offset,
    }
}

/// Seam between the pagination controller and the network.
///
/// [`WarpClient`] is the production implementation; tests drive the controller
/// with scripted in-memory sources instead.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<SubmissionsPage, FetchError>;
}

/// Client for the snapshot service.
pub struct WarpClient {
    http: reqwest::Client,
    base_url: String,
}

impl WarpClient {
    /// Create a client with the configured base URL and request timeout.
    ///
    /// The timeout is the only bound on a hung request; nothing above this
    /// layer retries or times out on its own.
    pub fn new(config: &SnapshotConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of submissions ordered by `new`, `old`, or `top`.
    ///
    /// `window` bounds the submissions' creation times and is only meaningful
    /// for top-sort; callers build it via [`build_page_request`].
    ///
    /// # Errors
    ///
    /// [`FetchError::Http`] for a non-success status (404 for an unknown
    /// subreddit, 500 for a snapshot failure), [`FetchError::Transport`] when
    /// the request does not complete, [`FetchError::Decode`] for a malformed
    /// body.
    pub async fn fetch_sorted_submissions(
        &self,
        subreddit: &str,
        anchor_timestamp: i64,
        sort: SortMode,
        window: Option<TimeWindow>,
        limit: usize,
        offset: usize,
    ) -> Result<SubmissionsPage, FetchError> {
        let url = format!(
            "{}/subreddits/{}/{}/submissions",
            self.base_url, subreddit, anchor_timestamp
        );
        let query = sorted_query(sort, window, limit, offset);
        debug!(%subreddit, anchor_timestamp, sort = sort.as_str(), offset, "fetching sorted submissions");
        self.get_page(&url, &query).await
    }

    /// Fetch one page of hot-ranked submissions.
    ///
    /// Hot is its own endpoint: the ranking is computed server-side as of the
    /// anchor timestamp, so no sort or window parameters apply.
    pub async fn fetch_hot_submissions(
        &self,
        subreddit: &str,
        anchor_timestamp: i64,
        limit: usize,
        offset: usize,
    ) -> Result<SubmissionsPage, FetchError> {
        let url = format!(
            "{}/subreddits/{}/{}/submissions/hot",
            self.base_url, subreddit, anchor_timestamp
        );
        let query = paging_query(limit, offset);
        debug!(%subreddit, anchor_timestamp, offset, "fetching hot submissions");
        self.get_page(&url, &query).await
    }

    /// Fetch the full list of subreddit names the service can materialize.
    ///
    /// Callers cache this; see [`crate::names::SubredditDirectory`].
    pub async fn list_subreddits(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/subreddits", self.base_url);
        debug!("fetching subreddit listing");
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

        response
            .json::<Vec<String>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    async fn get_page(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<SubmissionsPage, FetchError> {
        let response = self
            .http
            .get(url)
            .query(query)
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

        response
            .json::<SubmissionsPage>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SubmissionSource for WarpClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<SubmissionsPage, FetchError> {
        match request.sort {
            SortMode::Hot => {
                self.fetch_hot_submissions(
                    &request.subreddit,
                    request.anchor_timestamp,
                    request.limit,
                    request.offset,
                )
                .await
            }
            sort => {
                self.fetch_sorted_submissions(
                    &request.subreddit,
                    request.anchor_timestamp,
                    sort,
                    request.window,
                    request.limit,
                    request.offset,
                )
                .await
            }
        }
    }
}

fn sorted_query(
    sort: SortMode,
    window: Option<TimeWindow>,
    limit: usize,
    offset: usize,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("sort_by", sort.as_str().to_string())];
    if let Some(window) = window {
        query.push(("start_time", window.start.to_string()));
        query.push(("end_time", window.end.to_string()));
    }
    query.extend(paging_query(limit, offset));
    query
}

fn paging_query(limit: usize, offset: usize) -> Vec<(&'static str, String)> {
    vec![("limit", limit.to_string()), ("skip", offset.to_string())]
}
