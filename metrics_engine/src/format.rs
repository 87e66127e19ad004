//! Display-formatting collaborator seam.
//!
//! Rendering a number as a human-readable string is someone else's job;
//! the engine only knows the [`ValueFormatter`] interface and the format
//! token it was configured with. When no formatter is supplied the raw
//! numeric output stands on its own.

use crate::bundle::{Metric, MetricsBundle};

/// Format token used for change figures, which render as whole percents.
pub const CHANGE_FORMAT: &str = "0,0";

/// Renders a numeric value under a display-format token.
///
/// Implementations are external to this workspace (a numeral-style
/// formatter, a locale-aware one, a test stub). The trait is object-safe
/// so call sites hold a `&dyn ValueFormatter`.
pub trait ValueFormatter {
    /// Render `value` under `token`, e.g. `1234.5` + `"0,0"` -> `"1,235"`.
    fn format(&self, value: f64, token: &str) -> String;
}

/// Attach display strings to every metric in the bundle.
///
/// Change figures are scaled to whole percents before formatting. Zero
/// values and zero changes carry no pretty string.
pub fn prettify_bundle(bundle: &mut MetricsBundle, formatter: &dyn ValueFormatter, token: &str) {
    for metric in bundle.metrics_mut() {
        prettify_metric(metric, formatter, token);
    }
}

fn prettify_metric(metric: &mut Metric, formatter: &dyn ValueFormatter, token: &str) {
    match metric.value.as_number() {
        Some(v) if v != 0.0 => metric.pretty_value = Some(formatter.format(v, token)),
        _ => {}
    }
    match metric.change.as_number() {
        Some(c) if c != 0.0 => {
            metric.pretty_change = Some(formatter.format(c * 100.0, CHANGE_FORMAT));
        }
        _ => {}
    }
}
