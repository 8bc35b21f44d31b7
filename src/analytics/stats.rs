//! Descriptive statistics used by the spike detector

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Population mean and standard deviation of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: f64,

    /// Population standard deviation (denominator N)
    pub std_dev: f64,
}

/// Compute population mean and standard deviation
///
/// Returns `None` for an empty series, where neither value is defined.
#[must_use]
pub fn stats(values: &[f64]) -> Option<SeriesStats> {
    if values.is_empty() {
        return None;
    }

    Some(SeriesStats {
        mean: values.mean(),
        std_dev: values.population_std_dev(),
    })
}
