//! Calendar-day arithmetic shared by the fill window and the range sums.
//!
//! Week boundaries are convention-dependent; the reporting surfaces this
//! engine feeds disagree on whether a week begins on Sunday or Monday, so
//! the convention is an explicit [`WeekStart`] value rather than a locale
//! default.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of days in a week.
pub const DAYS_PER_WEEK: i64 = 7;

/// First day of the week for week-range arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Weeks run Sunday through Saturday.
    #[default]
    Sunday,
    /// Weeks run Monday through Sunday.
    Monday,
}

/// First day of the week containing `day`, under the given convention.
pub fn week_start_date(day: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let back = match week_start {
        WeekStart::Sunday => day.weekday().num_days_from_sunday(),
        WeekStart::Monday => day.weekday().num_days_from_monday(),
    };
    day - Duration::days(i64::from(back))
}

/// Last day of the week containing `day`, under the given convention.
pub fn week_end_date(day: NaiveDate, week_start: WeekStart) -> NaiveDate {
    week_start_date(day, week_start) + Duration::days(DAYS_PER_WEEK - 1)
}

/// First day of the calendar month containing `day`.
pub fn month_start_date(day: NaiveDate) -> NaiveDate {
    day.with_day(1).expect("the first of a month always exists")
}
