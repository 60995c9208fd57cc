//! Cross-dimensional agreement and strength.

use super::types::PerDimension;

/// `max(0, 1 − σ)` over the three supports (population standard deviation).
pub fn correlation_strength(support: &PerDimension<f64>) -> f64 {
    let values = support.values();
    let mean = values.iter().map(|v| **v).sum::<f64>() / 3.0;
    let variance = values.iter().map(|v| (**v - mean).powi(2)).sum::<f64>() / 3.0;
    let strength = 1.0 - variance.sqrt();
    if strength.is_finite() {
        strength.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Dimensions with support above `active_threshold`.
pub fn active_dimensions(support: &PerDimension<f64>, active_threshold: f64) -> usize {
    support.values().iter().filter(|v| ***v > active_threshold).count()
}

/// Dimensions with any support.
pub fn supporting_dimensions(support: &PerDimension<f64>) -> usize {
    support.values().iter().filter(|v| ***v > 0.0).count()
}

/// True when no dimension is active, or every dimension that carries evidence
/// is active (no split between strong and weak dimensions).
pub fn dimension_agreement(support: &PerDimension<f64>, active_threshold: f64) -> bool {
    let active = support.map(|v| *v > active_threshold);
    let present = support.map(|v| *v > 0.0);
    let any_active = active.values().iter().any(|a| **a);
    !any_active || active == present
}
