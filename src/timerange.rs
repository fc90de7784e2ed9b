//! Relative-period to absolute time-window resolution.
//!
//! Maps a named lookback period (`hour`, `day`, …) plus an anchor timestamp to
//! the absolute `[start, end]` window sent to the snapshot service. The window
//! always ends at the anchor; the start is a fixed offset below it.
//!
//! Month and year deliberately use fixed-day approximations (30 and 365 days)
//! rather than calendar arithmetic. The snapshot service filters on plain Unix
//! seconds, and "top of the last month" has always meant "top of the last 30
//! days" here; do not switch this to calendar-accurate math.

use crate::models::RelativePeriod;

pub const HOUR_SECS: i64 = 3_600;
pub const DAY_SECS: i64 = 86_400;
pub const WEEK_SECS: i64 = 604_800;
/// 30 days, not a calendar month.
pub const MONTH_SECS: i64 = 2_592_000;
/// 365 days, not a calendar year.
pub const YEAR_SECS: i64 = 31_536_000;

/// Absolute window in Unix seconds, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

/// Resolve a relative period against an anchor timestamp.
///
/// `end` is always the anchor. `start` is the anchor minus the period's fixed
/// offset; [`RelativePeriod::All`] pins the start to 0 (unbounded lower end).
/// Pure and infallible.
pub fn resolve(period: RelativePeriod, anchor_timestamp: i64) -> TimeWindow {
    let start = match period {
        RelativePeriod::Hour => anchor_timestamp - HOUR_SECS,
        RelativePeriod::Day => anchor_timestamp - DAY_SECS,
        RelativePeriod::Week => anchor_timestamp - WEEK_SECS,
        RelativePeriod::Month => anchor_timestamp - MONTH_SECS,
        RelativePeriod::Year => anchor_timestamp - YEAR_SECS,
        RelativePeriod::All => 0,
    };
    TimeWindow {
        start,
        end: anchor_timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_is_always_anchor() {
        let anchor = 1_617_036_992;
        for period in [
            RelativePeriod::Hour,
            RelativePeriod::Day,
            RelativePeriod::Week,
            RelativePeriod::Month,
            RelativePeriod::Year,
            RelativePeriod::All,
        ] {
            assert_eq!(resolve(period, anchor).end, anchor);
        }
    }

    #[test]
    fn test_day_offset() {
        let window = resolve(RelativePeriod::Day, 1_000_000);
        assert_eq!(window.start, 913_600);
        assert_eq!(window.end, 1_000_000);
    }

    #[test]
    fn test_all_starts_at_zero() {
        assert_eq!(resolve(RelativePeriod::All, 1_617_036_992).start, 0);
    }

    #[test]
    fn test_fixed_day_approximations() {
        let anchor = 100_000_000;
        assert_eq!(resolve(RelativePeriod::Hour, anchor).start, anchor - 3_600);
        assert_eq!(resolve(RelativePeriod::Week, anchor).start, anchor - 604_800);
        // 30 x 86400 and 365 x 86400, never calendar months/years.
        assert_eq!(
            resolve(RelativePeriod::Month, anchor).start,
            anchor - 30 * 86_400
        );
        assert_eq!(
            resolve(RelativePeriod::Year, anchor).start,
            anchor - 365 * 86_400
        );
    }
}
