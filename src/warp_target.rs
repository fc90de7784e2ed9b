//! Release date to anchor timestamp resolution.
//!
//! Given a title or episode from the metadata service, compute the anchor
//! timestamp to warp the browsing session to: local midnight of the release
//! date plus exactly 24 hours. Browsing "the day after release" avoids the
//! zero-content snapshot at the release instant itself while staying ahead of
//! long-term spoiler accumulation.
//!
//! A record without a usable date yields `None`, and callers treat that as a
//! no-op: the session keeps its current anchor.

use chrono::{Local, NaiveDate, TimeZone};

use crate::metadata::{Episode, ReleaseDate, Title};

const DAY_SECS: i64 = 86_400;

/// Warp target for a title: its start year, month and day defaulting to
/// January 1st. `None` when the title has no year.
pub fn resolve_from_title(title: &Title) -> Option<i64> {
    let year = title.start_year?;
    resolve(ReleaseDate {
        year,
        month: None,
        day: None,
    })
}

/// Warp target for an episode's release date. `None` when the episode is
/// undated.
pub fn resolve_from_episode(episode: &Episode) -> Option<i64> {
    resolve(episode.release_date?)
}

/// Local midnight of the (partially defaulted) date, plus 24 hours, as Unix
/// seconds.
///
/// Missing month/day default to 1. Returns `None` for an impossible date and
/// for a local midnight that does not exist (a DST transition skipping over
/// 00:00); an ambiguous midnight resolves to its earliest occurrence.
pub fn resolve(date: ReleaseDate) -> Option<i64> {
    let day = NaiveDate::from_ymd_opt(date.year, date.month.unwrap_or(1), date.day.unwrap_or(1))?;
    let midnight = day.and_hms_opt(0, 0, 0)?;
    let instant = Local.from_local_datetime(&midnight).earliest()?;
    Some(instant.timestamp() + DAY_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expected value computed with the same local-time rules the resolver
    /// uses, so the assertions hold in any timezone.
    fn local_midnight_ts(year: i32, month: u32, day: u32) -> i64 {
        Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(year, month, day)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )
            .earliest()
            .unwrap()
            .timestamp()
    }

    #[test]
    fn test_full_release_date_warps_to_next_day() {
        let episode = Episode {
            id: "tt1".to_string(),
            title: None,
            season: Some("1".to_string()),
            episode_number: Some(3),
            release_date: Some(ReleaseDate {
                year: 2021,
                month: Some(3),
                day: Some(30),
            }),
        };
        // 2021-03-30 00:00 local + 24h.
        assert_eq!(
            resolve_from_episode(&episode),
            Some(local_midnight_ts(2021, 3, 30) + 86_400)
        );
    }

    #[test]
    fn test_year_only_title_defaults_to_january_first() {
        let title = Title {
            id: "tt2".to_string(),
            primary_title: Some("Some Show".to_string()),
            title_type: Some("tvSeries".to_string()),
            start_year: Some(2021),
        };
        // 2021-01-01 00:00 local + 24h, i.e. Jan 2nd midnight.
        assert_eq!(
            resolve_from_title(&title),
            Some(local_midnight_ts(2021, 1, 1) + 86_400)
        );
    }

    #[test]
    fn test_missing_dates_yield_no_target() {
        let title = Title {
            id: "tt3".to_string(),
            primary_title: None,
            title_type: None,
            start_year: None,
        };
        assert_eq!(resolve_from_title(&title), None);

        let episode = Episode {
            id: "tt4".to_string(),
            title: None,
            season: None,
            episode_number: None,
            release_date: None,
        };
        assert_eq!(resolve_from_episode(&episode), None);
    }

    #[test]
    fn test_impossible_date_yields_no_target() {
        assert_eq!(
            resolve(ReleaseDate {
                year: 2021,
                month: Some(13),
                day: Some(1)
            }),
            None
        );
        assert_eq!(
            resolve(ReleaseDate {
                year: 2021,
                month: Some(2),
                day: Some(30)
            }),
            None
        );
    }
}
