//! Unified error type for the analysis facade.

use snafu::{Backtrace, Snafu};

use series_normalizer::options::OptionsError;

/// Errors that can occur when running an analysis.
///
/// Metric computation itself is infallible; data-level failure states are
/// expressed in the output as `"-"` / `null` cells, never as errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AnalyzeError {
    /// The supplied options could not be resolved into an effective
    /// configuration (bad timezone, invalid document, bad offsets).
    #[snafu(display("Invalid analysis options: {source}"))]
    Options {
        /// Underlying resolution failure.
        source: OptionsError,
        /// Captured at construction.
        backtrace: Backtrace,
    },
}
