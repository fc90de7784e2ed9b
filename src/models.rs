//! Core data models shared across the client, pagination, and CLI layers.
//!
//! These types mirror the snapshot service's wire format: a [`Submission`] is
//! an immutable historical record, and [`SubmissionsPage`] is the envelope the
//! service wraps around one page of results.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Deserialize;

use crate::timerange::TimeWindow;

/// One historical submission as archived by the snapshot service.
///
/// Immutable once fetched; the pagination layer only stores and orders these.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    /// Unique within a subreddit + anchor query. Duplicates across pages are
    /// possible and are dropped on append.
    pub id: String,
    pub title: String,
    pub author: String,
    pub selftext: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub score: i64,
    pub ups: Option<i64>,
    pub downs: Option<i64>,
    pub num_comments: Option<i64>,
    pub media_url: Option<String>,
}

/// Sort order for a browsing session.
///
/// `Hot` is served by its own endpoint (a ranking computed server-side as of
/// the anchor timestamp); the other three are `sort_by` values on the sorted
/// submissions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    New,
    Old,
    Top,
    Hot,
}

impl SortMode {
    /// Wire value for the `sort_by` query parameter. `Hot` never appears on
    /// the wire; it selects the hot endpoint instead.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::New => "new",
            SortMode::Old => "old",
            SortMode::Top => "top",
            SortMode::Hot => "hot",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named lookback window, meaningful only with [`SortMode::Top`].
///
/// `All` means no lower bound (window start pinned to 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RelativePeriod {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl RelativePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelativePeriod::Hour => "hour",
            RelativePeriod::Day => "day",
            RelativePeriod::Week => "week",
            RelativePeriod::Month => "month",
            RelativePeriod::Year => "year",
            RelativePeriod::All => "all",
        }
    }
}

impl std::fmt::Display for RelativePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one page fetch. Built once per request and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub subreddit: String,
    pub anchor_timestamp: i64,
    pub sort: SortMode,
    /// Present only for top-sort with a bounded relative period.
    pub window: Option<TimeWindow>,
    pub limit: usize,
    pub offset: usize,
}

/// Echo of the filters the sorted endpoint applied, as reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct FiltersEcho {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub sort_by: String,
}

/// One page of submissions as returned by either endpoint.
///
/// `count` is the number of items actually returned (not a total); a count
/// short of the requested limit is the terminal "no more data" signal.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionsPage {
    pub subreddit: String,
    pub snapshot_datetime: DateTime<Utc>,
    #[serde(default)]
    pub filters: Option<FiltersEcho>,
    pub submissions: Vec<Submission>,
    pub count: usize,
    pub limit: usize,
    pub skip: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_wire_values() {
        assert_eq!(SortMode::New.as_str(), "new");
        assert_eq!(SortMode::Old.as_str(), "old");
        assert_eq!(SortMode::Top.as_str(), "top");
    }

    #[test]
    fn test_page_deserializes_backend_envelope() {
        let body = r#"{
            "subreddit": "rust",
            "snapshot_datetime": "2021-03-29T16:56:32+00:00",
            "filters": {"start_time": null, "end_time": null, "sort_by": "new"},
            "submissions": [
                {
                    "id": "abc123",
                    "title": "Ownership explained",
                    "author": "ferris",
                    "selftext": null,
                    "created_utc": "2021-03-28T12:00:00+00:00",
                    "score": 412,
                    "ups": 430,
                    "downs": 18,
                    "num_comments": 57,
                    "media_url": null
                }
            ],
            "count": 1,
            "limit": 25,
            "skip": 0
        }"#;

        let page: SubmissionsPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.subreddit, "rust");
        assert_eq!(page.count, 1);
        assert_eq!(page.submissions[0].id, "abc123");
        assert_eq!(page.submissions[0].score, 412);
        assert_eq!(page.filters.as_ref().unwrap().sort_by, "new");
    }

    #[test]
    fn test_hot_page_has_no_filters_echo() {
        let body = r#"{
            "subreddit": "rust",
            "snapshot_datetime": "2021-03-29T16:56:32+00:00",
            "submissions": [],
            "count": 0,
            "limit": 25,
            "skip": 0
        }"#;

        let page: SubmissionsPage = serde_json::from_str(body).unwrap();
        assert!(page.filters.is_none());
        assert!(page.submissions.is_empty());
    }
}
