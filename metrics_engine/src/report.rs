//! The `analyze` facade: observations in, timeseries plus metrics out.

use serde::Serialize;
use snafu::ResultExt;

use series_normalizer::model::{Observation, Series};
use series_normalizer::normalize::normalize;
use series_normalizer::options::AnalyzeOptions;
use shared_utils::clock::Clock;

use crate::bundle::MetricsBundle;
use crate::engine::compute_metrics;
use crate::errors::{AnalyzeError, OptionsSnafu};
use crate::format::{ValueFormatter, prettify_bundle};

/// Complete output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// The dense, gap-filled daily series.
    pub timeseries: Series,
    /// The derived-statistics catalog over that series.
    pub metrics: MetricsBundle,
}

/// Run the full pipeline: resolve options, normalize, compute metrics.
///
/// The clock is read exactly once and the instant shared by both stages,
/// so the fill anchor and the metric day-offsets cannot disagree about
/// what "today" is. Given identical observations, options, and clock
/// reading, the output is identical.
pub fn analyze(
    observations: &[Observation],
    options: &AnalyzeOptions,
    clock: &dyn Clock,
) -> Result<Report, AnalyzeError> {
    analyze_with_formatter(observations, options, clock, None)
}

/// [`analyze`], additionally attaching display strings to every metric
/// through the supplied formatter collaborator.
pub fn analyze_with_formatter(
    observations: &[Observation],
    options: &AnalyzeOptions,
    clock: &dyn Clock,
    formatter: Option<&dyn ValueFormatter>,
) -> Result<Report, AnalyzeError> {
    let config = options.resolve().context(OptionsSnafu)?;
    let now = clock.now_utc();

    let timeseries = normalize(observations, &config, now);
    let mut metrics = compute_metrics(&timeseries, &config, now);
    if let Some(formatter) = formatter {
        prettify_bundle(&mut metrics, formatter, &config.format);
    }

    Ok(Report {
        timeseries,
        metrics,
    })
}
