//! Analysis options: parsing, validation, and resolution into an
//! immutable effective configuration.
//!
//! Key behaviors:
//! - Options deserialize from TOML (or any serde format) with unknown keys
//!   rejected; every field has a default so an empty document is valid.
//! - [`AnalyzeOptions::resolve`] is the single place where the
//!   mode-coupling rules live: a `ranking` or `view` option switches the
//!   bucketing/presentation behavior *and* forces the aggregates section
//!   off. Both the normalizer and the metrics engine consume only the
//!   resolved [`EffectiveConfig`], never raw options, so the coupling
//!   cannot drift between them.
//!
//! Entrypoints:
//! - Parse from a TOML string: [`load_options_str`]
//! - Parse from a file path: [`load_options_path`]

use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::day::WeekStart;
use crate::tz::{self, TzError};

/// Display-format token handed to the formatter collaborator when none is
/// configured.
pub const DEFAULT_FORMAT: &str = "0,0";

/// Exclusive snapshot views that switch same-day combination to
/// latest-wins and disable aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Running-total snapshots; only the latest same-day observation is
    /// meaningful.
    Totals,
    /// Percentage snapshots; summing same-day percentages is meaningless.
    Percentage,
}

/// Caller-supplied analysis options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzeOptions {
    /// Explicit backfill length in days; inferred from the observed span
    /// when absent (or zero).
    pub days: Option<u32>,

    /// IANA zone for all day/week boundary calculations. Falls back to the
    /// `TIMESERIES_TZ` environment variable, then the system zone.
    pub timezone: Option<String>,

    /// Anchor the fill window at the current day instead of the latest
    /// observed day.
    pub latest_today: bool,

    /// Ranking presentation: numeric values are sign-inverted and missing
    /// days become "no data" instead of zero. Disables aggregates.
    pub ranking: bool,

    /// Exclusive snapshot view, if any. Disables aggregates. Accepts the
    /// legacy `type` key in documents.
    #[serde(alias = "type")]
    pub view: Option<ViewKind>,

    /// Explicit aggregates toggle. Defaults to on; exclusive modes win
    /// over an explicit `true`.
    pub aggregates: Option<bool>,

    /// Display-format token for the formatter collaborator.
    pub format: Option<String>,

    /// Week-boundary convention for the weekly sums.
    pub week_start: WeekStart,

    /// Day offsets for the positional `daysAgoN` metrics.
    pub days_ago: Vec<u32>,

    /// How many `weekAgoN` entries to compute after the current week.
    pub week_count: u32,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            days: None,
            timezone: None,
            latest_today: false,
            ranking: false,
            view: None,
            aggregates: None,
            format: None,
            week_start: WeekStart::default(),
            days_ago: vec![7, 14, 21],
            week_count: 3,
        }
    }
}

/// How same-day observations combine into one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucketing {
    /// Sum all numeric observations of the day.
    Sum,
    /// Keep only the chronologically latest observation of the day.
    LatestWins,
}

/// How bucket values present and how missing days are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Values pass through unchanged; missing days become explicit zeros.
    Standard,
    /// Values are sign-inverted so ascending numeric sort ranks
    /// descending; missing days become "no data".
    Ranking,
}

/// Immutable resolved configuration consumed by both pipeline stages.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    /// Active zone for every day/week boundary.
    pub tz: Tz,
    /// Same-day combination rule.
    pub bucketing: Bucketing,
    /// Presentation transform and fill default.
    pub presentation: Presentation,
    /// Whether the aggregates/weekly section is computed at all.
    pub aggregates_enabled: bool,
    /// Explicit fill length, when configured and non-zero.
    pub days: Option<u32>,
    /// Anchor the fill window at "today" instead of the latest observation.
    pub latest_today: bool,
    /// Week-boundary convention.
    pub week_start: WeekStart,
    /// Offsets for the `daysAgoN` metrics.
    pub days_ago: Vec<u32>,
    /// Number of `weekAgoN` entries.
    pub week_count: u32,
    /// Display-format token for the formatter collaborator.
    pub format: String,
}

impl EffectiveConfig {
    /// Value inserted for a day with no source data.
    pub fn fill_default(&self) -> Option<f64> {
        match self.presentation {
            Presentation::Standard => Some(0.0),
            Presentation::Ranking => None,
        }
    }
}

/// Errors from option parsing or resolution.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The configured timezone could not be resolved.
    #[error("invalid timezone")]
    Timezone(#[from] TzError),

    /// The options file could not be read.
    #[error("failed to read options file {path}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The options document did not parse (bad TOML or unknown keys).
    #[error("invalid options document")]
    Parse(#[from] toml::de::Error),

    /// A `days_ago` offset of zero would alias the `latest` metric.
    #[error("days_ago offsets must be non-zero")]
    ZeroDaysAgo,
}

impl AnalyzeOptions {
    /// Validate and resolve into an [`EffectiveConfig`].
    pub fn resolve(&self) -> Result<EffectiveConfig, OptionsError> {
        if self.days_ago.iter().any(|n| *n == 0) {
            return Err(OptionsError::ZeroDaysAgo);
        }
        let tz = tz::resolve_tz(self.timezone.as_deref())?;
        let bucketing = if self.view.is_some() {
            Bucketing::LatestWins
        } else {
            Bucketing::Sum
        };
        let presentation = if self.ranking {
            Presentation::Ranking
        } else {
            Presentation::Standard
        };
        let aggregates_enabled =
            self.aggregates.unwrap_or(true) && !self.ranking && self.view.is_none();
        Ok(EffectiveConfig {
            tz,
            bucketing,
            presentation,
            aggregates_enabled,
            days: self.days.filter(|d| *d > 0),
            latest_today: self.latest_today,
            week_start: self.week_start,
            days_ago: self.days_ago.clone(),
            week_count: self.week_count,
            format: self
                .format
                .clone()
                .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
        })
    }
}

/// Parse options from a TOML string.
pub fn load_options_str(raw: &str) -> Result<AnalyzeOptions, OptionsError> {
    Ok(toml::from_str(raw)?)
}

/// Parse options from a TOML file.
pub fn load_options_path(path: impl AsRef<Path>) -> Result<AnalyzeOptions, OptionsError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_options_str(&raw)
}
