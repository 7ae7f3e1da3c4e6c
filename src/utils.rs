//! Utility functions for the rating engine

/// Arithmetic mean, or `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Widen `[min, max]` by a tenth of its range on each side
///
/// A zero-width range is widened by one unit so an axis never collapses.
pub fn padded_bounds(min: f64, max: f64) -> (f64, f64) {
    let range = max - min;
    let pad = if range > 0.0 { range / 10.0 } else { 1.0 };
    (min - pad, max + pad)
}
