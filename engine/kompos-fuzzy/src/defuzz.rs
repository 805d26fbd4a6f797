//! Discretized centroid defuzzification.

use kompos_core::{ScoringSpec, Variable};
use ndarray::Array1;
use tracing::debug;

/// Computes the crisp centroid of a scored output.
///
/// `aggregated` holds one max-aggregated strength per term, aligned to the
/// variable's term order. The universe is sampled from `spec.min` to
/// `spec.max` inclusive at `spec.step`; at each sample the term membership
/// is clipped to its aggregated strength and the clipped terms are unioned
/// with max. The centroid is Σ(x·μ) / Σ(μ).
///
/// Returns `None` when the aggregated area is zero (no rule fired for this
/// output), which callers surface as a no-conclusion verdict distinct from
/// a genuine 0 score.
pub fn defuzzify(variable: &Variable, spec: &ScoringSpec, aggregated: &[f64]) -> Option<f64> {
    if aggregated.iter().all(|strength| *strength <= 0.0) {
        return None;
    }

    // The small epsilon keeps fractional steps that exactly divide the
    // span from losing their final sample to float rounding.
    let samples = ((spec.max - spec.min) / spec.step + 1e-9).floor() as usize + 1;
    let xs = Array1::from_iter((0..samples).map(|i| spec.min + i as f64 * spec.step));
    let mut union: Array1<f64> = Array1::zeros(samples);

    for (term, strength) in variable.terms.iter().zip(aggregated) {
        if *strength <= 0.0 {
            continue;
        }
        for (i, x) in xs.iter().enumerate() {
            let clipped = term.shape.membership(*x).min(*strength);
            if clipped > union[i] {
                union[i] = clipped;
            }
        }
    }

    let area = union.sum();
    if area == 0.0 {
        return None;
    }
    let score = xs.dot(&union) / area;
    debug!("defuzzified `{}` to {:.2}", variable.name, score);
    Some(score)
}
