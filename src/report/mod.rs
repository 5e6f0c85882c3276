//! Aggregations behind the report modes and the writers that emit them.
//!
//! The aggregations are pure functions of already fetched data and a
//! reference date, so they can be tested without a clock or network. The
//! writers are generic over [`std::io::Write`]:
//!
//! - CSV through the `csv` crate, with headers taken from the row type
//! - pretty-printed JSON
//! - HTML pages rendered with `minijinja`

mod daily;
mod quarterly;
mod review;
mod stats;
mod work_done;
mod writers;

pub use daily::{CreatedRow, DailyOpenRow, created_per_day, daily_open_counts};
pub use quarterly::{QuarterRow, community_activity};
pub use review::{ReviewRow, review_rows};
pub use stats::{
    NEEDS_CLOSING_DAYS, NEEDS_PING_DAYS, Overview, RepositoryActivity, RepositorySummary, StatsEntry,
    StatsReport, StatsSection, Totals,
};
pub use work_done::{WeekRow, next_wednesday, weekly_work_done, window_start};
pub use writers::{write_csv, write_json, write_release_html, write_review_html, write_stats_html};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::github::error::SweepError;

/// Start of `day` in UTC.
pub(crate) fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Range membership shared by the period reports: both bounds excluded.
pub(crate) fn strictly_within(
    at: DateTime<Utc>,
    left: DateTime<Utc>,
    right: DateTime<Utc>,
) -> bool {
    at > left && at < right
}

pub(crate) fn io_error(error: &std::io::Error) -> SweepError {
    SweepError::Io {
        message: error.to_string(),
    }
}
