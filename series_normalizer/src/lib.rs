//! Daily time-series normalization.
//!
//! Turns a sparse, irregularly time-stamped stream of observations into a
//! dense, sorted, day-bucketed series: timezone-aware day truncation,
//! same-day combination (sum or latest-wins), gap backfill, and the
//! ranking presentation transform. The output series is what the metrics
//! layer consumes; this crate has no dependency on it.

#![deny(missing_docs)]

pub mod day;
pub mod model;
pub mod normalize;
pub mod options;
pub mod tz;
