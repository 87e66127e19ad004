//! Range sums and global aggregates.
//!
//! Every sum here observes the value-missing discipline: a "no data"
//! bucket contributes nothing, which is observably different from
//! contributing zero. Week windows derive from the injected "now", not
//! from the series anchor.

use chrono::NaiveDate;
use chrono_tz::Tz;
use indexmap::IndexMap;

use series_normalizer::day::{month_start_date, week_end_date, week_start_date};
use series_normalizer::model::{MetricValue, Series, relative_change};
use series_normalizer::options::EffectiveConfig;
use series_normalizer::tz::local_date;

use crate::bundle::{AggregateMetrics, Metric};

/// Days summed by the trailing-window metric, including today.
const TRAILING_WINDOW_DAYS: i64 = 30;

pub(crate) fn compute_aggregates(
    series: &Series,
    config: &EffectiveConfig,
    today: NaiveDate,
) -> AggregateMetrics {
    AggregateMetrics {
        weeks: week_metrics(series, config, today),
        month_to_date: range_metric(
            series,
            config.tz,
            "Month to Date",
            month_start_date(today),
            today,
        ),
        last_30_days: range_metric(
            series,
            config.tz,
            "Last 30 Days",
            today - chrono::Duration::days(TRAILING_WINDOW_DAYS - 1),
            today,
        ),
        total: total_metric(series),
        average: average_metric(series),
        maximum: extremum_metric(series, "Max", |a, b| a.max(b)),
        minimum: extremum_metric(series, "Min", |a, b| a.min(b)),
    }
}

/// Current week plus `week_count` earlier weeks, each change chained
/// against the immediately preceding week.
fn week_metrics(
    series: &Series,
    config: &EffectiveConfig,
    today: NaiveDate,
) -> IndexMap<String, Metric> {
    let current_start = week_start_date(today, config.week_start);
    // One extra sum so the oldest listed week still has a comparison period.
    let sums: Vec<Option<f64>> = (0..=i64::from(config.week_count) + 1)
        .map(|n| {
            let start = current_start - chrono::Duration::weeks(n);
            let end = week_end_date(start, config.week_start);
            week_sum(series, config.tz, start, end)
        })
        .collect();

    let mut weeks = IndexMap::new();
    for n in 0..=config.week_count as usize {
        let key = if n == 0 {
            "thisWeek".to_string()
        } else {
            format!("weekAgo{n}")
        };
        let description = match n {
            0 => "This Week".to_string(),
            1 => "1 week ago".to_string(),
            _ => format!("{n} weeks ago"),
        };
        weeks.insert(
            key,
            Metric::new(
                description,
                MetricValue::from_option(sums[n]),
                relative_change(sums[n + 1], sums[n]),
            ),
        );
    }
    weeks
}

/// Closed-range sum of numeric bucket values; `None` for an empty series.
fn week_sum(series: &Series, tz: Tz, from: NaiveDate, to: NaiveDate) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    Some(range_sum(series, tz, from, to))
}

fn range_metric(
    series: &Series,
    tz: Tz,
    description: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Metric {
    let value = if series.is_empty() {
        MetricValue::NotComputable
    } else {
        MetricValue::Number(range_sum(series, tz, from, to))
    };
    Metric::new(description, value, MetricValue::NotApplicable)
}

fn range_sum(series: &Series, tz: Tz, from: NaiveDate, to: NaiveDate) -> f64 {
    series
        .iter()
        .filter(|bucket| {
            let day = local_date(bucket.date, tz);
            day >= from && day <= to
        })
        .filter_map(|bucket| bucket.value)
        .sum()
}

fn total_metric(series: &Series) -> Metric {
    let value = if series.is_empty() {
        MetricValue::NotComputable
    } else {
        MetricValue::Number(numeric_values(series).sum())
    };
    Metric::new("Total", value, MetricValue::NotApplicable)
}

/// Total over series length: backfilled and no-data days both count in
/// the denominator, only numeric values in the numerator.
fn average_metric(series: &Series) -> Metric {
    let value = if series.is_empty() {
        MetricValue::NotComputable
    } else {
        let total: f64 = numeric_values(series).sum();
        MetricValue::Number(round2(total / series.len() as f64))
    };
    Metric::new("Average", value, MetricValue::NotApplicable)
}

fn extremum_metric(series: &Series, description: &str, pick: impl Fn(f64, f64) -> f64) -> Metric {
    let value = MetricValue::from_option(numeric_values(series).reduce(pick));
    Metric::new(description, value, MetricValue::NotApplicable)
}

fn numeric_values(series: &Series) -> impl Iterator<Item = f64> + '_ {
    series.iter().filter_map(|bucket| bucket.value)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// -------------------- tests --------------------
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    use series_normalizer::day::WeekStart;
    use series_normalizer::model::DayBucket;
    use series_normalizer::options::AnalyzeOptions;

    fn utc_config() -> EffectiveConfig {
        AnalyzeOptions {
            timezone: Some("UTC".to_string()),
            ..AnalyzeOptions::default()
        }
        .resolve()
        .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bucket(y: i32, m: u32, d: u32, value: Option<f64>) -> DayBucket {
        DayBucket {
            date: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
            value,
            change: MetricValue::NotComputable,
        }
    }

    #[test]
    fn range_sum_is_closed_on_both_ends() {
        let series = vec![
            bucket(2025, 6, 10, Some(1.0)),
            bucket(2025, 6, 11, Some(2.0)),
            bucket(2025, 6, 12, Some(4.0)),
        ];
        let sum = range_sum(&series, chrono_tz::UTC, day(2025, 6, 10), day(2025, 6, 11));
        assert_eq!(sum, 3.0);
    }

    #[test]
    fn no_data_buckets_are_excluded_not_zeroed() {
        let series = vec![
            bucket(2025, 6, 10, Some(5.0)),
            bucket(2025, 6, 11, None),
            bucket(2025, 6, 12, Some(7.0)),
        ];
        assert_eq!(
            range_sum(&series, chrono_tz::UTC, day(2025, 6, 10), day(2025, 6, 12)),
            12.0
        );
        assert_eq!(total_metric(&series).value, MetricValue::Number(12.0));
        assert_eq!(extremum_metric(&series, "Max", f64::max).value, MetricValue::Number(7.0));
        assert_eq!(extremum_metric(&series, "Min", f64::min).value, MetricValue::Number(5.0));
    }

    #[test]
    fn average_divides_by_full_series_length() {
        // Three buckets, one non-numeric: 12 / 3, not 12 / 2.
        let series = vec![
            bucket(2025, 6, 10, Some(5.0)),
            bucket(2025, 6, 11, None),
            bucket(2025, 6, 12, Some(7.0)),
        ];
        assert_eq!(average_metric(&series).value, MetricValue::Number(4.0));
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let series = vec![
            bucket(2025, 6, 10, Some(1.0)),
            bucket(2025, 6, 11, Some(1.0)),
            bucket(2025, 6, 12, Some(0.0)),
        ];
        assert_eq!(average_metric(&series).value, MetricValue::Number(0.67));
    }

    #[test]
    fn weekly_changes_are_chained() {
        // now = Wednesday 2025-06-18; Sunday weeks.
        // This week (Jun 15-21): 5. Last week (Jun 8-14): 4. Two back: 8.
        let series = vec![
            bucket(2025, 6, 4, Some(8.0)),
            bucket(2025, 6, 10, Some(4.0)),
            bucket(2025, 6, 16, Some(2.0)),
            bucket(2025, 6, 17, Some(3.0)),
        ];
        let weeks = week_metrics(&series, &utc_config(), day(2025, 6, 18));
        assert_eq!(weeks["thisWeek"].value, MetricValue::Number(5.0));
        assert_eq!(weeks["thisWeek"].change, MetricValue::Number(0.25));
        assert_eq!(weeks["weekAgo1"].value, MetricValue::Number(4.0));
        assert_eq!(weeks["weekAgo1"].change, MetricValue::Number(-0.5));
        assert_eq!(weeks["weekAgo2"].value, MetricValue::Number(8.0));
        // Week 3 back is empty: 8 vs 0 divides by a zero baseline.
        assert_eq!(weeks["weekAgo2"].change, MetricValue::NotComputable);
        assert_eq!(weeks["weekAgo3"].value, MetricValue::Number(0.0));
        assert_eq!(weeks.len(), 4);
    }

    #[test]
    fn week_convention_moves_a_sunday_bucket() {
        // 2025-06-15 is a Sunday. Under the Sunday convention it opens the
        // current week; under Monday it closed the previous one.
        let series = vec![bucket(2025, 6, 15, Some(9.0))];
        let today = day(2025, 6, 18);

        let sunday = week_metrics(&series, &utc_config(), today);
        assert_eq!(sunday["thisWeek"].value, MetricValue::Number(9.0));

        let monday_config = AnalyzeOptions {
            timezone: Some("UTC".to_string()),
            week_start: WeekStart::Monday,
            ..AnalyzeOptions::default()
        }
        .resolve()
        .unwrap();
        let monday = week_metrics(&series, &monday_config, today);
        assert_eq!(monday["thisWeek"].value, MetricValue::Number(0.0));
        assert_eq!(monday["weekAgo1"].value, MetricValue::Number(9.0));
    }

    #[test]
    fn month_to_date_and_trailing_window() {
        let series = vec![
            bucket(2025, 5, 31, Some(10.0)),
            bucket(2025, 6, 1, Some(1.0)),
            bucket(2025, 6, 18, Some(2.0)),
        ];
        let aggregates = compute_aggregates(&series, &utc_config(), day(2025, 6, 18));
        // May 31 is outside the calendar month but inside the trailing 30 days.
        assert_eq!(aggregates.month_to_date.value, MetricValue::Number(3.0));
        assert_eq!(aggregates.month_to_date.change, MetricValue::NotApplicable);
        assert_eq!(aggregates.last_30_days.value, MetricValue::Number(13.0));
    }

    #[test]
    fn empty_series_is_all_dashes() {
        let aggregates = compute_aggregates(&Series::new(), &utc_config(), day(2025, 6, 18));
        assert_eq!(aggregates.total.value, MetricValue::NotComputable);
        assert_eq!(aggregates.average.value, MetricValue::NotComputable);
        assert_eq!(aggregates.maximum.value, MetricValue::NotComputable);
        assert_eq!(aggregates.minimum.value, MetricValue::NotComputable);
        assert_eq!(aggregates.month_to_date.value, MetricValue::NotComputable);
        assert_eq!(aggregates.weeks["thisWeek"].value, MetricValue::NotComputable);
        assert_eq!(aggregates.weeks["thisWeek"].change, MetricValue::NotComputable);
    }
}
