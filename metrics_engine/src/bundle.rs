//! Output shape of the metrics engine.
//!
//! Serialization uses camelCase keys and the tri-state sentinels from
//! [`series_normalizer::model::MetricValue`], so the wire shape matches
//! what the reporting/dashboard surfaces consume: `"-"` for "not
//! computable", `null` for "not applicable by design". Variable-key
//! groups (`daysAgoN`, `weekAgoN`) are ordered maps flattened into their
//! section.

use indexmap::IndexMap;
use serde::Serialize;

use series_normalizer::model::MetricValue;

/// A single named statistic with its change figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Human-readable label, e.g. `"7 days ago"`.
    pub description: String,

    /// The statistic itself.
    pub value: MetricValue,

    /// Change against this metric's comparison period.
    pub change: MetricValue,

    /// Display string for `value`, present when a formatter was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty_value: Option<String>,

    /// Display string for `change`, present when a formatter was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty_change: Option<String>,
}

impl Metric {
    pub(crate) fn new(
        description: impl Into<String>,
        value: MetricValue,
        change: MetricValue,
    ) -> Self {
        Self {
            description: description.into(),
            value,
            change,
            pretty_value: None,
            pretty_change: None,
        }
    }

    /// A metric whose value and change are both unavailable.
    pub(crate) fn not_computable(description: impl Into<String>) -> Self {
        Self::new(
            description,
            MetricValue::NotComputable,
            MetricValue::NotComputable,
        )
    }
}

/// Single-day snapshot metrics; always present in a bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    /// Today's bucket by exact calendar date.
    pub today: Metric,
    /// Yesterday's bucket by exact calendar date.
    pub yesterday: Metric,
    /// The bucket two days back by exact calendar date.
    pub day_before: Metric,
    /// The final bucket of the series by position, whatever day it is.
    pub latest: Metric,
    /// Positional look-backs keyed `daysAgoN`, compared against the last
    /// bucket.
    #[serde(flatten)]
    pub days_ago: IndexMap<String, Metric>,
}

/// Weekly, calendar-window, and global aggregate metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    /// Week sums keyed `thisWeek`, `weekAgo1`, ...; each change is
    /// chained against the immediately earlier week.
    #[serde(flatten)]
    pub weeks: IndexMap<String, Metric>,
    /// Calendar-month-to-date sum.
    pub month_to_date: Metric,
    /// Trailing 30-day sum ending today.
    pub last_30_days: Metric,
    /// Sum of all numeric buckets.
    pub total: Metric,
    /// Total divided by series length, rounded to two decimals.
    pub average: Metric,
    /// Largest numeric bucket value.
    pub maximum: Metric,
    /// Smallest numeric bucket value.
    pub minimum: Metric,
}

/// The full metric catalog for one analysis run.
///
/// `aggregates` is `None` when configuration disabled the section —
/// explicitly off, or an exclusive ranking/snapshot view where summing
/// would mislead. Absent means absent: consumers get a type-level signal,
/// not zeroes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsBundle {
    /// Always-present daily snapshots.
    pub daily: DailyMetrics,
    /// Aggregate section, when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<AggregateMetrics>,
}

impl MetricsBundle {
    /// Mutable access to every metric in the bundle, for formatting.
    pub fn metrics_mut(&mut self) -> Vec<&mut Metric> {
        let mut all: Vec<&mut Metric> = vec![
            &mut self.daily.today,
            &mut self.daily.yesterday,
            &mut self.daily.day_before,
            &mut self.daily.latest,
        ];
        all.extend(self.daily.days_ago.values_mut());
        if let Some(aggregates) = self.aggregates.as_mut() {
            all.extend(aggregates.weeks.values_mut());
            all.push(&mut aggregates.month_to_date);
            all.push(&mut aggregates.last_30_days);
            all.push(&mut aggregates.total);
            all.push(&mut aggregates.average);
            all.push(&mut aggregates.maximum);
            all.push(&mut aggregates.minimum);
        }
        all
    }
}

// -------------------- tests --------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_serializes_sentinels_and_camel_case() {
        let metric = Metric::new("Total", MetricValue::Number(5.0), MetricValue::NotApplicable);
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "description": "Total", "value": 5.0, "change": null })
        );

        let metric = Metric::not_computable("Today");
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "description": "Today", "value": "-", "change": "-" })
        );
    }

    #[test]
    fn pretty_fields_appear_only_when_set() {
        let mut metric = Metric::new("Latest", MetricValue::Number(1200.0), MetricValue::Number(0.5));
        metric.pretty_value = Some("1,200".to_string());
        let json = serde_json::to_value(&metric).unwrap();
        assert_eq!(json["prettyValue"], "1,200");
        assert!(json.get("prettyChange").is_none());
    }
}
