//! Browsing session state.
//!
//! The small tuple every fetch is parameterized by: which subreddit, as of
//! when, in which order, over which lookback window. The session owns the
//! canonical values; the presentation layer reads them and mutates them only
//! through the explicit warp setters below. Scrolling never changes a session.

use crate::models::{RelativePeriod, SortMode};

/// Canonical browsing parameters for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub subreddit: String,
    /// Point in time being browsed "as of", Unix seconds.
    pub anchor_timestamp: i64,
    pub sort: SortMode,
    /// Only meaningful with [`SortMode::Top`]; `None` behaves like
    /// [`RelativePeriod::All`] (unbounded lower bound).
    pub period: Option<RelativePeriod>,
}

impl SessionState {
    pub fn new(subreddit: impl Into<String>, anchor_timestamp: i64, sort: SortMode) -> Self {
        Self {
            subreddit: subreddit.into(),
            anchor_timestamp,
            sort,
            period: None,
        }
    }

    pub fn with_period(mut self, period: RelativePeriod) -> Self {
        self.period = Some(period);
        self
    }

    /// Commit to a new anchor timestamp, keeping the rest of the session.
    ///
    /// This is the "warp" action, the only way the anchor moves, whether the
    /// user picked a time directly or a warp target was resolved from a
    /// title/episode release date.
    pub fn warp_to(&mut self, anchor_timestamp: i64) {
        self.anchor_timestamp = anchor_timestamp;
    }

    /// Switch subreddit, keeping anchor and sort.
    pub fn set_subreddit(&mut self, subreddit: impl Into<String>) {
        self.subreddit = subreddit.into();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
    }

    pub fn set_period(&mut self, period: Option<RelativePeriod>) {
        self.period = period;
    }

    /// The period that actually bounds a top-sort query, if any.
    ///
    /// Returns `None` for non-top sorts, for an absent period, and for
    /// [`RelativePeriod::All`]; in all three cases no window parameters are
    /// sent and the server's default (unbounded up to the anchor) applies.
    pub fn bounded_period(&self) -> Option<RelativePeriod> {
        if self.sort != SortMode::Top {
            return None;
        }
        match self.period {
            Some(RelativePeriod::All) | None => None,
            Some(p) => Some(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_only_bounds_top_sort() {
        let mut session = SessionState::new("rust", 1_617_036_992, SortMode::New)
            .with_period(RelativePeriod::Week);
        assert_eq!(session.bounded_period(), None);

        session.set_sort(SortMode::Top);
        assert_eq!(session.bounded_period(), Some(RelativePeriod::Week));
    }

    #[test]
    fn test_all_and_absent_periods_are_unbounded() {
        let mut session = SessionState::new("rust", 1_617_036_992, SortMode::Top);
        assert_eq!(session.bounded_period(), None);

        session.set_period(Some(RelativePeriod::All));
        assert_eq!(session.bounded_period(), None);
    }

    #[test]
    fn test_warp_moves_only_the_anchor() {
        let mut session = SessionState::new("rust", 1_617_036_992, SortMode::Hot);
        session.warp_to(1_300_000_000);
        assert_eq!(session.anchor_timestamp, 1_300_000_000);
        assert_eq!(session.subreddit, "rust");
        assert_eq!(session.sort, SortMode::Hot);
    }
}
