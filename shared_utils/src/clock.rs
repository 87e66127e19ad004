//! Injectable clock abstraction.
//!
//! The analytics engine is a pure function of its inputs and one "now"
//! instant. Callers hand the engine a [`Clock`] so that instant is read
//! exactly once per invocation and can be pinned in tests; day-boundary
//! arithmetic in the normalizer and the metrics engine must agree on the
//! same moment.

use chrono::{DateTime, Utc};

/// Source of the current instant.
///
/// Implement this for anything that can answer "what time is it now" —
/// the trait is object-safe so call sites can hold a `&dyn Clock`.
pub trait Clock {
    /// The current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall-clock backed [`Clock`] for production call sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A [`Clock`] frozen at a single instant.
///
/// Used in tests and replays where the analysis must be deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_its_instant() {
        let t = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(FixedClock(t).now_utc(), t);
        assert_eq!(FixedClock(t).now_utc(), t);
    }
}
