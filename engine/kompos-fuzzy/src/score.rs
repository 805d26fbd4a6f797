//! Score banding and post-defuzzification safety overrides.
//!
//! Both steps run after the fuzzy computation proper and are pure over
//! their inputs, so deployments can be checked band-by-band without
//! running inference.

use kompos_core::{LabelOverride, QualityScore, ScoringSpec};
use tracing::debug;

/// Maps a crisp score onto its quality band label: the first band whose
/// cutoff the score does not exceed. Scores beyond every cutoff take the
/// final band (validation keeps that unreachable for in-universe scores).
pub fn classify(spec: &ScoringSpec, score: f64) -> &str {
    for band in &spec.bands {
        if score <= band.max_score {
            return &band.label;
        }
    }
    spec.bands.last().map(|b| b.label.as_str()).unwrap_or("")
}

/// Applies one safety override to a banded verdict.
///
/// When the watched membership reaches `min_membership`, the verdict label
/// is replaced with the hazard variant and the score clamped down to the
/// cap. Inconclusive verdicts pass through untouched; an override
/// replaces a conclusion, it does not invent one.
pub fn apply_override(rule: &LabelOverride, watched_membership: f64, verdict: &mut QualityScore) {
    if !verdict.conclusive || watched_membership < rule.min_membership {
        return;
    }
    debug!(
        "safety override on `{}`/`{}` forcing label `{}`",
        rule.variable, rule.label, rule.forced_label
    );
    verdict.label = Some(rule.forced_label.clone());
    verdict.value = verdict.value.min(rule.score_cap);
}
