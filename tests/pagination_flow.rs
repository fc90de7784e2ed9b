//! End-to-end pagination flow against a scripted in-memory source.
//!
//! Drives a [`BrowseSession`] the way the presentation layer would: first
//! page on warp, scroll-probed next pages, retry after failure. No network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use subwarp::client::{FetchError, SubmissionSource};
use subwarp::models::{PageRequest, SortMode, Submission, SubmissionsPage};
use subwarp::pagination::{BrowseSession, Phase, PAGE_SIZE};
use subwarp::session::SessionState;

/// Replays a queue of canned responses and records every request it saw.
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<SubmissionsPage, FetchError>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<SubmissionsPage, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionSource for ScriptedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<SubmissionsPage, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted source ran out of responses")
    }
}

fn submission(id: &str) -> Submission {
    Submission {
        id: id.to_string(),
        title: format!("post {id}"),
        author: "someone".to_string(),
        selftext: None,
        created_utc: Utc.timestamp_opt(1_617_000_000, 0).unwrap(),
        score: 10,
        ups: None,
        downs: None,
        num_comments: Some(2),
        media_url: None,
    }
}

fn page(prefix: &str, len: usize, skip: usize) -> SubmissionsPage {
    let submissions: Vec<Submission> = (0..len)
        .map(|i| submission(&format!("{prefix}{i}")))
        .collect();
    SubmissionsPage {
        subreddit: "television".to_string(),
        snapshot_datetime: Utc.timestamp_opt(1_617_036_992, 0).unwrap(),
        filters: None,
        submissions,
        count: len,
        limit: PAGE_SIZE,
        skip,
    }
}

#[tokio::test]
async fn hot_browse_scrolls_until_short_page() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(page("a", 25, 0)),
        Ok(page("b", 12, 25)),
    ]));
    let session = SessionState::new("television", 1_617_036_992, SortMode::Hot);
    let mut browse = BrowseSession::new(source.clone(), session);

    browse.load_first_page().await;
    assert_eq!(browse.controller().phase(), Phase::Ready);
    assert_eq!(browse.controller().items().len(), 25);
    assert!(browse.controller().has_more());

    // Scroll near the bottom: offset picks up where the list left off.
    assert!(browse.load_next_page(100.0).await);
    assert_eq!(browse.controller().items().len(), 37);
    assert!(!browse.controller().has_more());

    // Short page was terminal; further scrolling issues no request.
    assert!(!browse.load_next_page(0.0).await);

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].offset, 0);
    assert_eq!(requests[1].offset, 25);
    assert_eq!(requests[1].sort, SortMode::Hot);
    assert!(requests[1].window.is_none());
}

#[tokio::test]
async fn far_scroll_positions_do_not_fetch() {
    let source = Arc::new(ScriptedSource::new(vec![Ok(page("a", 25, 0))]));
    let session = SessionState::new("television", 1_617_036_992, SortMode::Hot);
    let mut browse = BrowseSession::new(source.clone(), session);

    browse.load_first_page().await;
    assert!(!browse.load_next_page(5_000.0).await);
    assert_eq!(source.requests().len(), 1);
}

#[tokio::test]
async fn next_page_failure_keeps_items_and_retry_recovers() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(page("a", 25, 0)),
        Err(FetchError::Http {
            status: 500,
            detail: "snapshot failed".to_string(),
        }),
        Ok(page("b", 3, 25)),
    ]));
    let session = SessionState::new("television", 1_617_036_992, SortMode::Hot);
    let mut browse = BrowseSession::new(source.clone(), session);

    browse.load_first_page().await;
    assert!(browse.load_next_page(0.0).await);

    // The failed increment lost nothing that was already loaded.
    assert_eq!(browse.controller().phase(), Phase::Error);
    assert_eq!(browse.controller().items().len(), 25);

    assert!(browse.retry().await);
    assert_eq!(browse.controller().phase(), Phase::Ready);
    assert_eq!(browse.controller().items().len(), 28);
    assert!(!browse.controller().has_more());

    // Retry re-issued the exact failed request.
    let requests = source.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1], requests[2]);
}

#[tokio::test]
async fn warping_resets_the_window() {
    let source = Arc::new(ScriptedSource::new(vec![
        Ok(page("a", 25, 0)),
        Ok(page("b", 7, 0)),
    ]));
    let session = SessionState::new("television", 1_617_036_992, SortMode::Hot);
    let mut browse = BrowseSession::new(source.clone(), session);

    browse.load_first_page().await;
    assert_eq!(browse.controller().items().len(), 25);

    // Warp a year further back: the accumulated list starts over at offset 0.
    browse
        .warp(SessionState::new("television", 1_585_500_992, SortMode::Hot))
        .await;
    assert_eq!(browse.controller().items().len(), 7);
    assert_eq!(browse.controller().session().anchor_timestamp, 1_585_500_992);

    let requests = source.requests();
    assert_eq!(requests[1].offset, 0);
    assert_eq!(requests[1].anchor_timestamp, 1_585_500_992);
}
