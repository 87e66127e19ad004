//! Observation-to-series normalization.
//!
//! Pipeline: timezone-aware day truncation, same-day combination (sum or
//! latest-wins), fill-window backfill, the ranking transform, and
//! per-bucket day-over-day change annotation. Bucket keys are local
//! calendar days held in a `BTreeMap`, so the ascending-by-date
//! postcondition the metrics layer's positional lookups rely on is
//! structural rather than a final sort.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::model::{DayBucket, MetricValue, Observation, Series, relative_change};
use crate::options::{Bucketing, EffectiveConfig, Presentation};
use crate::tz::{local_date, local_day_start};

/// Normalize raw observations into a dense, sorted, day-bucketed series.
///
/// `now` must be the same instant later handed to the metrics engine;
/// callers read their clock once per analysis so the fill anchor and the
/// engine's day offsets cannot straddle a midnight.
///
/// An empty observation set yields an empty series.
pub fn normalize(
    observations: &[Observation],
    config: &EffectiveConfig,
    now: DateTime<Utc>,
) -> Series {
    let combined = combine_by_day(observations, config);
    if combined.is_empty() {
        return Series::new();
    }

    let earliest = *combined.keys().next().expect("non-empty map");
    let latest_observed = *combined.keys().next_back().expect("non-empty map");
    let anchor = if config.latest_today {
        local_date(now, config.tz)
    } else {
        latest_observed
    };

    let days_to_fill = match config.days {
        Some(days) => i64::from(days),
        // Ordinal subtraction: spans that cross a year boundary come out
        // short or negative and then fill nothing. Known limitation of the
        // inferred range; pass `days` explicitly to avoid it.
        None => i64::from(latest_observed.ordinal()) - i64::from(earliest.ordinal()),
    };

    let mut values: BTreeMap<NaiveDate, Option<f64>> =
        combined.into_iter().map(|(day, v)| (day, Some(v))).collect();
    let fill = config.fill_default();
    for i in 0..days_to_fill.max(0) {
        values.entry(anchor - Duration::days(i)).or_insert(fill);
    }

    if config.presentation == Presentation::Ranking {
        for value in values.values_mut() {
            if let Some(v) = value.as_mut() {
                *v = -*v;
            }
        }
    }

    let mut series = Series::with_capacity(values.len());
    let mut prev: Option<Option<f64>> = None;
    for (day, value) in values {
        let change = match prev {
            None => MetricValue::NotComputable,
            Some(prev_value) => relative_change(prev_value, value),
        };
        series.push(DayBucket {
            date: local_day_start(day, config.tz),
            value,
            change,
        });
        prev = Some(value);
    }

    tracing::debug!(
        buckets = series.len(),
        days_to_fill,
        "normalized observations into daily series"
    );
    series
}

/// Collapse observations onto their local calendar day.
///
/// Non-numeric observations never create a bucket; a day whose only
/// observations are non-numeric is indistinguishable from a day with none
/// and is handled by the backfill.
fn combine_by_day(
    observations: &[Observation],
    config: &EffectiveConfig,
) -> BTreeMap<NaiveDate, f64> {
    let mut combined = BTreeMap::new();
    match config.bucketing {
        Bucketing::Sum => {
            for obs in observations {
                let Some(v) = obs.numeric() else { continue };
                *combined.entry(local_date(obs.timestamp, config.tz)).or_insert(0.0) += v;
            }
        }
        Bucketing::LatestWins => {
            let mut latest_seen: BTreeMap<NaiveDate, DateTime<Utc>> = BTreeMap::new();
            for obs in observations {
                let Some(v) = obs.numeric() else { continue };
                let day = local_date(obs.timestamp, config.tz);
                let newer = latest_seen
                    .get(&day)
                    .is_none_or(|seen| obs.timestamp >= *seen);
                if newer {
                    latest_seen.insert(day, obs.timestamp);
                    combined.insert(day, v);
                }
            }
        }
    }
    combined
}
