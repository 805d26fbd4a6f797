//! Inference result records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Crisp verdict for a scored output variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Centroid score within the output universe; 0.0 when inconclusive.
    pub value: f64,
    /// Band or override label; `None` when inconclusive.
    pub label: Option<String>,
    /// False when no rule fired for this output. A genuine score of 0 and
    /// a no-conclusion result are distinguished here, never by the value.
    pub conclusive: bool,
}

impl QualityScore {
    /// The no-conclusion verdict.
    pub fn inconclusive() -> Self {
        Self {
            value: 0.0,
            label: None,
            conclusive: false,
        }
    }
}

/// Result for one output variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputResult {
    /// Defuzzified crisp score with its quality label.
    Score(QualityScore),
    /// Combined certainty factor per concluded label; empty when no rule
    /// fired for this output.
    Conclusions(BTreeMap<String, f64>),
}

impl OutputResult {
    pub fn as_score(&self) -> Option<&QualityScore> {
        match self {
            OutputResult::Score(score) => Some(score),
            OutputResult::Conclusions(_) => None,
        }
    }

    pub fn as_conclusions(&self) -> Option<&BTreeMap<String, f64>> {
        match self {
            OutputResult::Conclusions(map) => Some(map),
            OutputResult::Score(_) => None,
        }
    }
}

/// Full result of one inference call, keyed by output variable name. Every
/// declared output variable appears, fired or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InferenceReport {
    pub outputs: BTreeMap<String, OutputResult>,
}

impl InferenceReport {
    /// Crisp verdict of a scored output.
    pub fn score(&self, variable: &str) -> Option<&QualityScore> {
        self.outputs.get(variable).and_then(OutputResult::as_score)
    }

    /// Conclusion map of a concluded output.
    pub fn conclusions(&self, variable: &str) -> Option<&BTreeMap<String, f64>> {
        self.outputs
            .get(variable)
            .and_then(OutputResult::as_conclusions)
    }

    /// Strongest conclusion for a concluded output, if any fired.
    pub fn strongest_conclusion(&self, variable: &str) -> Option<(&str, f64)> {
        self.conclusions(variable)?
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(label, cf)| (label.as_str(), *cf))
    }
}
