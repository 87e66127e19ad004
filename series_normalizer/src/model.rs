//! Canonical in-memory representation of observations, day buckets, and
//! metric cells.
//!
//! These types are vendor-agnostic and flow through the whole pipeline:
//! raw [`Observation`]s enter the normalizer, a [`Series`] of
//! [`DayBucket`]s comes out, and the metrics layer reuses [`MetricValue`]
//! and [`relative_change`] for its own catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// A single raw input observation.
///
/// Duplicates on the same calendar day are expected and are combined by the
/// normalizer, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// When the observation happened (UTC).
    pub timestamp: DateTime<Utc>,

    /// The observed value. `None` means present-but-non-numeric: the
    /// observation is accepted but contributes to no bucket or aggregate.
    pub value: Option<f64>,
}

impl Observation {
    /// An observation carrying a numeric value.
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp,
            value: Some(value),
        }
    }

    /// An observation whose value is missing.
    pub fn missing(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }

    /// Numeric payload, if any. `NaN` counts as missing.
    pub fn numeric(&self) -> Option<f64> {
        self.value.filter(|v| !v.is_nan())
    }
}

/// Tri-state cell used for metric values and change figures.
///
/// The two non-numeric states are observably different on the wire and to
/// consumers: `NotComputable` (serialized `"-"`) means the data needed for
/// the figure is absent, `NotApplicable` (serialized `null`) means the
/// figure is undefined for that metric by design (e.g. a total has no
/// change).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// An ordinary numeric figure.
    Number(f64),
    /// Not computable from the available data; serialized as `"-"`.
    NotComputable,
    /// Not semantically applicable; serialized as `null`.
    NotApplicable,
}

impl MetricValue {
    /// Lift an optional number, mapping `None` to [`MetricValue::NotComputable`].
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(n) => Self::Number(n),
            None => Self::NotComputable,
        }
    }

    /// The numeric payload, if this cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::NotComputable => serializer.serialize_str("-"),
            Self::NotApplicable => serializer.serialize_none(),
        }
    }
}

/// Relative change of `subject` against `baseline`.
///
/// Convention, applied uniformly across every metric kind in this
/// workspace: `(subject - baseline) / baseline`, so a 100 -> 150 move reads
/// `0.5`. Equal values short-circuit to `0` before the zero-baseline guard;
/// a zero baseline with a different subject is not computable (`"-"`), as
/// is any side that is missing or non-finite.
pub fn relative_change(baseline: Option<f64>, subject: Option<f64>) -> MetricValue {
    match (baseline, subject) {
        (Some(b), Some(s)) if b.is_finite() && s.is_finite() => {
            if b == s {
                MetricValue::Number(0.0)
            } else if b == 0.0 {
                MetricValue::NotComputable
            } else {
                MetricValue::Number((s - b) / b)
            }
        }
        _ => MetricValue::NotComputable,
    }
}

/// One calendar day's aggregated value in the normalized series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayBucket {
    /// Start-of-day instant of this bucket's calendar day in the active
    /// zone, as UTC. Serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,

    /// Aggregated value for the day. `None` only when the bucket was
    /// backfilled in ranking mode and had no source data.
    pub value: Option<f64>,

    /// Day-over-day change against the previous bucket; `"-"` for the
    /// first bucket or when either side is non-numeric.
    pub change: MetricValue,
}

/// A dense, ascending-by-date run of day buckets.
pub type Series = Vec<DayBucket>;
