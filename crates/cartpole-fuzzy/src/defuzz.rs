// ─────────────────────────────────────────────────────────────────────
// CartPole Fuzzy — Defuzzification
// © 1998–2026 Miroslav Šotek. All rights reserved.
// ─────────────────────────────────────────────────────────────────────
//! Centroid defuzzification.

use cartpole_types::error::{FuzzyError, FuzzyResult};
use ndarray::Array1;

use crate::fuzzy_set::FuzzySet;

/// Weighted mean `Σ xᵢ·μᵢ / Σ μᵢ` of `set` over the sample points `grid`.
///
/// An all-zero set has no centroid and yields [`FuzzyError::NoActivation`]
/// for `variable`; the caller decides the fallback value.
pub fn centroid(grid: &Array1<f64>, set: &FuzzySet, variable: &str) -> FuzzyResult<f64> {
    if grid.len() != set.len() {
        return Err(FuzzyError::ConfigError(format!(
            "fuzzy set has {} degrees but '{variable}' has {} samples",
            set.len(),
            grid.len()
        )));
    }
    let total = set.total();
    if total <= 0.0 || !total.is_finite() {
        return Err(FuzzyError::NoActivation {
            variable: variable.to_string(),
        });
    }
    Ok(grid.dot(set.degrees()) / total)
}
