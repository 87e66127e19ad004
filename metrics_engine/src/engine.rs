//! Bundle assembly from a normalized series and one "now" instant.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use series_normalizer::model::Series;
use series_normalizer::options::EffectiveConfig;
use series_normalizer::tz::local_date;

use crate::aggregates::compute_aggregates;
use crate::bundle::{DailyMetrics, MetricsBundle};
use crate::daily::{days_ago_metric, exact_day_metric, latest_metric};

/// Compute the full metric catalog over a normalized series.
///
/// `now` must be the same instant the normalizer was given; every exact-day
/// and week-window lookup derives from it. The aggregates section is
/// omitted entirely when the effective configuration disables it.
pub fn compute_metrics(
    series: &Series,
    config: &EffectiveConfig,
    now: DateTime<Utc>,
) -> MetricsBundle {
    let today = local_date(now, config.tz);

    let mut days_ago = IndexMap::new();
    for &n in &config.days_ago {
        days_ago.insert(format!("daysAgo{n}"), days_ago_metric(series, n));
    }

    let daily = DailyMetrics {
        today: exact_day_metric(series, config, today, 0, "Today"),
        yesterday: exact_day_metric(series, config, today, 1, "Yesterday"),
        day_before: exact_day_metric(series, config, today, 2, "Day Before"),
        latest: latest_metric(series),
        days_ago,
    };

    let aggregates = config
        .aggregates_enabled
        .then(|| compute_aggregates(series, config, today));

    tracing::debug!(
        buckets = series.len(),
        aggregates = aggregates.is_some(),
        "computed metrics bundle"
    );

    MetricsBundle { daily, aggregates }
}
