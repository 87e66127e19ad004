//! Single-day snapshot metrics.
//!
//! Two distinct lookup designs, both intentional:
//! - `today`/`yesterday`/`dayBefore` find a bucket by exact calendar day
//!   relative to "now" and compare it against its positional predecessor.
//! - `latest` and `daysAgoN` are purely positional; `daysAgoN` compares
//!   against the *last* bucket, not against "N+1 days ago".

use chrono::{Duration, NaiveDate};

use series_normalizer::model::{MetricValue, Series, relative_change};
use series_normalizer::options::EffectiveConfig;
use series_normalizer::tz::local_date;

use crate::bundle::Metric;

/// Metric for the bucket exactly `offset` days before `today`.
pub(crate) fn exact_day_metric(
    series: &Series,
    config: &EffectiveConfig,
    today: NaiveDate,
    offset: u32,
    description: &str,
) -> Metric {
    let target = today - Duration::days(i64::from(offset));
    match series
        .iter()
        .position(|bucket| local_date(bucket.date, config.tz) == target)
    {
        Some(index) => positional_metric(series, index, description),
        None => Metric::not_computable(description),
    }
}

/// Metric for the final bucket of the series, whatever day it falls on.
pub(crate) fn latest_metric(series: &Series) -> Metric {
    if series.is_empty() {
        return Metric::not_computable("Latest");
    }
    positional_metric(series, series.len() - 1, "Latest")
}

/// Positional look-back `n` buckets from the end, compared against the
/// last bucket.
pub(crate) fn days_ago_metric(series: &Series, n: u32) -> Metric {
    let description = format!("{n} days ago");
    let Some(last) = series.last() else {
        return Metric::not_computable(description);
    };
    match series
        .len()
        .checked_sub(n as usize + 1)
        .map(|index| &series[index])
    {
        Some(ago) => Metric::new(
            description,
            MetricValue::from_option(ago.value),
            relative_change(last.value, ago.value),
        ),
        None => Metric::not_computable(description),
    }
}

/// Bucket at `index` compared against its predecessor.
fn positional_metric(series: &Series, index: usize, description: &str) -> Metric {
    let bucket = &series[index];
    let baseline = if index == 0 {
        None
    } else {
        series[index - 1].value
    };
    Metric::new(
        description,
        MetricValue::from_option(bucket.value),
        relative_change(baseline, bucket.value),
    )
}

// -------------------- tests --------------------
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    use series_normalizer::model::Observation;
    use series_normalizer::normalize::normalize;
    use series_normalizer::options::AnalyzeOptions;

    fn utc_config() -> EffectiveConfig {
        AnalyzeOptions {
            timezone: Some("UTC".to_string()),
            ..AnalyzeOptions::default()
        }
        .resolve()
        .unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        at(2025, 6, 15, 12)
    }

    fn series_of(observations: &[Observation]) -> Series {
        normalize(observations, &utc_config(), now())
    }

    #[test]
    fn today_looks_up_the_exact_day() {
        let series = series_of(&[
            Observation::new(at(2025, 6, 15, 9), 100.0),
            Observation::new(at(2025, 6, 14, 9), 50.0),
        ]);
        let config = utc_config();
        let today = local_date(now(), config.tz);

        let metric = exact_day_metric(&series, &config, today, 0, "Today");
        assert_eq!(metric.value, MetricValue::Number(100.0));
        assert_eq!(metric.change, MetricValue::Number(1.0));
    }

    #[test]
    fn absent_day_is_not_computable() {
        let series = series_of(&[Observation::new(at(2025, 6, 14, 9), 1.0)]);
        let config = utc_config();
        let today = local_date(now(), config.tz);

        let metric = exact_day_metric(&series, &config, today, 0, "Today");
        assert_eq!(metric.value, MetricValue::NotComputable);
        assert_eq!(metric.change, MetricValue::NotComputable);
    }

    #[test]
    fn latest_is_positional_and_may_be_in_the_past() {
        let series = series_of(&[Observation::new(at(2025, 6, 14, 9), 1.0)]);
        let metric = latest_metric(&series);
        assert_eq!(metric.description, "Latest");
        assert_eq!(metric.value, MetricValue::Number(1.0));
        // Sole bucket: nothing to compare against.
        assert_eq!(metric.change, MetricValue::NotComputable);
    }

    #[test]
    fn days_ago_compares_against_the_last_bucket() {
        let series = series_of(&[
            Observation::new(at(2025, 6, 15, 9), 100.0),
            Observation::new(at(2025, 6, 14, 9), 25.0),
            Observation::new(at(2025, 6, 8, 9), 50.0),
        ]);
        let metric = days_ago_metric(&series, 7);
        assert_eq!(metric.description, "7 days ago");
        assert_eq!(metric.value, MetricValue::Number(50.0));
        // (50 - 100) / 100, change relative to the latest bucket.
        assert_eq!(metric.change, MetricValue::Number(-0.5));
    }

    #[test]
    fn days_ago_beyond_the_series_is_not_computable() {
        let series = series_of(&[Observation::new(at(2025, 6, 15, 9), 1.0)]);
        let metric = days_ago_metric(&series, 14);
        assert_eq!(metric.value, MetricValue::NotComputable);
        assert_eq!(metric.change, MetricValue::NotComputable);
    }

    #[test]
    fn empty_series_never_indexes() {
        let series = Series::new();
        let config = utc_config();
        let today = local_date(now(), config.tz);
        assert_eq!(
            exact_day_metric(&series, &config, today, 0, "Today").value,
            MetricValue::NotComputable
        );
        assert_eq!(latest_metric(&series).value, MetricValue::NotComputable);
        assert_eq!(days_ago_metric(&series, 7).value, MetricValue::NotComputable);
    }
}
