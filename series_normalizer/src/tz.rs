//! Time zone resolution and day-boundary conversion helpers.
//!
//! What this module provides:
//! - [`parse_tz`]: Parse an IANA zone name (e.g., "America/New_York") into a
//!   [`chrono_tz::Tz`], with a typed error for unknown names.
//! - [`resolve_tz`]: Pick the active zone for an analysis run: an explicit
//!   option wins, then the `TIMESERIES_TZ` environment variable, then the
//!   system zone.
//! - [`local_date`]: The calendar day a UTC instant falls on in a zone.
//! - [`local_day_start`]: The start-of-day instant for a calendar day in a
//!   zone, converted back to UTC.
//!
//! Notes:
//! - All bucket keys are local calendar days; all stored instants are UTC.
//! - DST makes some local midnights nonexistent (spring-forward) or
//!   ambiguous (fall-back). [`local_day_start`] resolves deterministically:
//!   ambiguous midnights take the earlier instant, nonexistent midnights
//!   shift forward minute-by-minute to the first instant that exists.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Environment variable consulted when no explicit timezone is configured.
pub const TZ_ENV_VAR: &str = "TIMESERIES_TZ";

/// Errors from time zone resolution.
#[derive(Debug, Error)]
pub enum TzError {
    /// The given name is not a known IANA zone.
    #[error("unknown timezone: {0}")]
    Unknown(String),

    /// The system zone could not be determined.
    #[error("could not determine the system timezone")]
    System,
}

/// Parse an IANA zone name into a [`Tz`].
pub fn parse_tz(name: &str) -> Result<Tz, TzError> {
    name.parse()
        .map_err(|_| TzError::Unknown(name.to_string()))
}

/// The zone the host system reports itself to be in.
pub fn system_tz() -> Result<Tz, TzError> {
    let name = iana_time_zone::get_timezone().map_err(|_| TzError::System)?;
    parse_tz(&name)
}

/// Resolve the active zone for an analysis run.
///
/// Precedence: explicit option, then [`TZ_ENV_VAR`], then the system zone.
pub fn resolve_tz(explicit: Option<&str>) -> Result<Tz, TzError> {
    if let Some(name) = explicit {
        return parse_tz(name);
    }
    if let Some(name) = shared_utils::env::get_env_var_opt(TZ_ENV_VAR) {
        return parse_tz(&name);
    }
    system_tz()
}

/// The calendar day `ts` falls on in `tz`.
pub fn local_date(ts: DateTime<Utc>, tz: Tz) -> NaiveDate {
    ts.with_timezone(&tz).date_naive()
}

/// Start-of-day instant for `day` in `tz`, as UTC.
///
/// Ambiguous midnights (fall-back) take the earlier instant. Nonexistent
/// midnights (spring-forward, e.g. America/Santiago) step forward in
/// one-minute increments until the first valid instant of the day.
pub fn local_day_start(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let mut t = midnight;
            for _ in 0..120 {
                // cap at 2 hours; no named zone skips more than that at once
                t += Duration::minutes(1);
                if let LocalResult::Single(dt) = tz.from_local_datetime(&t) {
                    return dt.with_timezone(&Utc);
                }
            }
            Utc.from_utc_datetime(&midnight)
        }
    }
}
