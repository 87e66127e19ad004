//! Derived-statistics catalog over a normalized daily series.
//!
//! Consumes the dense series produced by `series_normalizer` plus one
//! injected "now" instant and computes the named metric bundle: daily
//! snapshots, chained weekly sums, month-to-date and trailing-30-day
//! sums, and global aggregates, each paired with a period-over-period
//! change figure. The [`report`] module wires both stages into the
//! `analyze` facade.

#![deny(missing_docs)]

mod aggregates;
mod daily;

pub mod bundle;
pub mod engine;
pub mod errors;
pub mod format;
pub mod report;
