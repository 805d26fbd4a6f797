//! Confidence aggregation: certainty-factor combination and fuzzy max.

use kompos_core::round_dp;

/// Decimal places combined certainty factors are rounded to.
pub const CF_DECIMALS: u32 = 4;

/// Combines the certainty-factor contributions recorded for one conclusion.
///
/// Pairwise `combined = combined + c × (1 − combined)`, the probabilistic
/// OR. The fold runs in a canonical order (ascending), so any permutation
/// of the same contributions produces the bit-identical result; the
/// combined value is monotonically non-decreasing in the number of
/// contributions and stays within [0, 1].
pub fn combine_cf(contributions: &[f64]) -> f64 {
    if contributions.is_empty() {
        return 0.0;
    }
    let mut sorted = contributions.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mut combined = sorted[0];
    for c in &sorted[1..] {
        combined += c * (1.0 - combined);
    }
    round_dp(combined.clamp(0.0, 1.0), CF_DECIMALS)
}

/// Maximum contribution for one output category (fuzzy OR); 0 when no rule
/// fired.
pub fn max_strength(contributions: &[f64]) -> f64 {
    contributions.iter().copied().fold(0.0, f64::max)
}
