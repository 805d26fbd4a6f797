//! Input and output variable definitions and the validated variable table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::set::FuzzySet;
use crate::{KomposError, Result, SetShape};

/// Score band: crisp scores at or below `max_score` classify as `label`.
/// Bands are ordered ascending and must cover the output universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBand {
    pub max_score: f64,
    pub label: String,
}

impl QualityBand {
    pub fn new(max_score: f64, label: impl Into<String>) -> Self {
        Self {
            max_score,
            label: label.into(),
        }
    }
}

/// Post-defuzzification safety override: when the watched input label holds
/// at `min_membership` or above, the verdict label is replaced and the
/// crisp score clamped down to `score_cap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelOverride {
    /// Input variable watched for the hazard condition.
    pub variable: String,
    /// Label on the watched variable.
    pub label: String,
    /// Minimum membership degree that arms the override.
    pub min_membership: f64,
    /// Label forced onto the verdict.
    pub forced_label: String,
    /// Upper bound clamped onto the crisp score.
    pub score_cap: f64,
}

/// Defuzzification and labeling configuration for a scored output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSpec {
    /// Lower bound of the output universe.
    pub min: f64,
    /// Upper bound of the output universe.
    pub max: f64,
    /// Sample step of the discretized centroid; the grid runs from `min`
    /// to `max` inclusive.
    pub step: f64,
    /// Ascending score bands covering the universe.
    pub bands: Vec<QualityBand>,
    /// Safety overrides applied after defuzzification.
    pub overrides: Vec<LabelOverride>,
}

/// The role a variable plays in inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariableKind {
    /// Continuous input with a bounded universe; readings are clamped into
    /// it before membership evaluation.
    Numeric { min: f64, max: f64 },
    /// Discrete linguistic input matched by string value.
    Categorical,
    /// Numeric output: firing strengths are max-aggregated per label,
    /// defuzzified to a crisp score, and banded into a quality label.
    Scored(ScoringSpec),
    /// Linguistic output: certainty factors are combined per conclusion
    /// label.
    Concluded,
}

/// A named input or output dimension owning an ordered, non-empty list of
/// labeled fuzzy sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub kind: VariableKind,
    /// Ordered terms; labels are unique within a variable.
    pub terms: Vec<FuzzySet>,
}

impl Variable {
    /// Continuous input variable over `[min, max]`.
    pub fn numeric(name: impl Into<String>, min: f64, max: f64, terms: Vec<FuzzySet>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Numeric { min, max },
            terms,
        }
    }

    /// Categorical input variable.
    pub fn categorical(name: impl Into<String>, terms: Vec<FuzzySet>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Categorical,
            terms,
        }
    }

    /// Scored output variable.
    pub fn scored(name: impl Into<String>, spec: ScoringSpec, terms: Vec<FuzzySet>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Scored(spec),
            terms,
        }
    }

    /// Concluded output variable. Each label doubles as its own categorical
    /// match value, so one pass's conclusions can be fed back in as a
    /// categorical reading of a later pass.
    pub fn concluded(name: impl Into<String>, labels: &[&str]) -> Self {
        let terms = labels
            .iter()
            .map(|label| {
                FuzzySet::new(
                    *label,
                    SetShape::Categorical {
                        value: (*label).to_string(),
                    },
                )
            })
            .collect();
        Self {
            name: name.into(),
            kind: VariableKind::Concluded,
            terms,
        }
    }

    /// Looks up a term by label.
    pub fn term(&self, label: &str) -> Option<&FuzzySet> {
        self.terms.iter().find(|t| t.label == label)
    }

    /// Position of a term within the ordered term list.
    pub fn term_index(&self, label: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.label == label)
    }

    /// True for output kinds.
    pub fn is_output(&self) -> bool {
        matches!(
            self.kind,
            VariableKind::Scored(_) | VariableKind::Concluded
        )
    }

    /// Numeric universe, when the variable has one.
    pub fn universe(&self) -> Option<(f64, f64)> {
        match &self.kind {
            VariableKind::Numeric { min, max } => Some((*min, *max)),
            VariableKind::Scored(spec) => Some((spec.min, spec.max)),
            _ => None,
        }
    }

    /// Clamps a raw value into the variable's universe. NaN resolves to the
    /// lower bound; variables without a numeric universe pass the value
    /// through.
    pub fn clamp(&self, x: f64) -> f64 {
        match self.universe() {
            Some((min, max)) => x.max(min).min(max),
            None => x,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let fail = |reason: String| {
            Err(KomposError::InvalidVariable {
                variable: self.name.clone(),
                reason,
            })
        };
        if self.name.is_empty() {
            return Err(KomposError::InvalidVariable {
                variable: String::new(),
                reason: "variable name must not be empty".to_string(),
            });
        }
        if self.terms.is_empty() {
            return fail("variable has no terms".to_string());
        }
        for (i, term) in self.terms.iter().enumerate() {
            if term.label.is_empty() {
                return fail("term label must not be empty".to_string());
            }
            if self.terms[..i].iter().any(|t| t.label == term.label) {
                return fail(format!("duplicate label `{}`", term.label));
            }
            term.shape.validate(&self.name, &term.label)?;
            let wants_numeric = matches!(
                self.kind,
                VariableKind::Numeric { .. } | VariableKind::Scored(_)
            );
            if wants_numeric != term.shape.is_numeric() {
                return Err(KomposError::InvalidSet {
                    variable: self.name.clone(),
                    label: term.label.clone(),
                    reason: if wants_numeric {
                        "numeric variable cannot hold a categorical set".to_string()
                    } else {
                        "categorical variable requires categorical sets".to_string()
                    },
                });
            }
        }
        match &self.kind {
            VariableKind::Numeric { min, max } => validate_universe(&self.name, *min, *max)?,
            VariableKind::Scored(spec) => self.validate_scoring(spec)?,
            VariableKind::Categorical | VariableKind::Concluded => {}
        }
        Ok(())
    }

    fn validate_scoring(&self, spec: &ScoringSpec) -> Result<()> {
        let fail = |reason: String| {
            Err(KomposError::InvalidVariable {
                variable: self.name.clone(),
                reason,
            })
        };
        validate_universe(&self.name, spec.min, spec.max)?;
        if !spec.step.is_finite() || spec.step <= 0.0 || spec.step > spec.max - spec.min {
            return fail(format!(
                "step {} must be positive and no larger than the universe span",
                spec.step
            ));
        }
        if spec.bands.is_empty() {
            return fail("scored output needs at least one band".to_string());
        }
        let mut previous = f64::NEG_INFINITY;
        for band in &spec.bands {
            if band.label.is_empty() {
                return fail("band label must not be empty".to_string());
            }
            if !band.max_score.is_finite() || band.max_score <= previous {
                return fail(format!(
                    "band cutoffs must be finite and strictly increasing, got {}",
                    band.max_score
                ));
            }
            previous = band.max_score;
        }
        if previous < spec.max {
            return fail(format!(
                "bands end at {previous} but the universe extends to {}",
                spec.max
            ));
        }
        for o in &spec.overrides {
            if !(o.min_membership > 0.0 && o.min_membership <= 1.0) {
                return fail(format!(
                    "override on `{}` needs min_membership in (0, 1], got {}",
                    o.variable, o.min_membership
                ));
            }
            if o.forced_label.is_empty() {
                return fail(format!("override on `{}` has an empty label", o.variable));
            }
            if !o.score_cap.is_finite() || o.score_cap < spec.min || o.score_cap > spec.max {
                return fail(format!(
                    "override score cap {} falls outside the universe",
                    o.score_cap
                ));
            }
        }
        Ok(())
    }
}

fn validate_universe(name: &str, min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(KomposError::InvalidVariable {
            variable: name.to_string(),
            reason: format!("universe [{min}, {max}] must be finite with min < max"),
        });
    }
    Ok(())
}

/// Validated, name-indexed collection of variables. Construction is the
/// single validation point: a table that exists is well-formed.
#[derive(Debug, Clone)]
pub struct VariableTable {
    variables: Vec<Variable>,
    index: HashMap<String, usize>,
}

impl VariableTable {
    pub fn new(variables: Vec<Variable>) -> Result<Self> {
        let mut index = HashMap::with_capacity(variables.len());
        for (i, variable) in variables.iter().enumerate() {
            variable.validate()?;
            if index.insert(variable.name.clone(), i).is_some() {
                return Err(KomposError::DuplicateVariable {
                    name: variable.name.clone(),
                });
            }
        }
        let table = Self { variables, index };
        table.validate_overrides()?;
        Ok(table)
    }

    /// Checks that every label override watches an existing variable/label.
    fn validate_overrides(&self) -> Result<()> {
        for variable in &self.variables {
            let VariableKind::Scored(spec) = &variable.kind else {
                continue;
            };
            for o in &spec.overrides {
                let Some(watched) = self.get(&o.variable) else {
                    return Err(KomposError::InvalidVariable {
                        variable: variable.name.clone(),
                        reason: format!(
                            "label override references unknown variable `{}`",
                            o.variable
                        ),
                    });
                };
                if watched.term(&o.label).is_none() {
                    return Err(KomposError::InvalidVariable {
                        variable: variable.name.clone(),
                        reason: format!(
                            "label override references unknown label `{}` on `{}`",
                            o.label, o.variable
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.index_of(name).map(|i| &self.variables[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Variable at a table index.
    ///
    /// Panics when the index is out of range; indices come from
    /// [`VariableTable::index_of`] or iteration and stay valid for the
    /// table's lifetime.
    pub fn by_index(&self, index: usize) -> &Variable {
        &self.variables[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suhu() -> Variable {
        Variable::numeric(
            "suhu",
            0.0,
            80.0,
            vec![
                FuzzySet::new(
                    "dingin",
                    SetShape::RampLow {
                        shoulder: 28.0,
                        foot: 35.0,
                    },
                ),
                FuzzySet::new(
                    "ideal",
                    SetShape::Triangle {
                        left: 30.0,
                        peak: 45.0,
                        right: 55.0,
                    },
                ),
            ],
        )
    }

    fn status() -> Variable {
        Variable::scored(
            "status",
            ScoringSpec {
                min: 0.0,
                max: 100.0,
                step: 1.0,
                bands: vec![
                    QualityBand::new(45.0, "Buruk"),
                    QualityBand::new(100.0, "Baik"),
                ],
                overrides: vec![],
            },
            vec![
                FuzzySet::new(
                    "buruk",
                    SetShape::RampLow {
                        shoulder: 30.0,
                        foot: 50.0,
                    },
                ),
                FuzzySet::new(
                    "baik",
                    SetShape::Triangle {
                        left: 70.0,
                        peak: 85.0,
                        right: 95.0,
                    },
                ),
            ],
        )
    }

    #[test]
    fn table_indexes_variables_by_name() {
        let table = VariableTable::new(vec![suhu(), status()]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of("status"), Some(1));
        assert_eq!(table.get("suhu").unwrap().terms.len(), 2);
        assert!(table.get("ph").is_none());
    }

    #[test]
    fn duplicate_variable_names_are_rejected() {
        let err = VariableTable::new(vec![suhu(), suhu()]).unwrap_err();
        assert!(matches!(
            err,
            crate::KomposError::DuplicateVariable { name } if name == "suhu"
        ));
    }

    #[test]
    fn empty_terms_are_rejected() {
        let bare = Variable::numeric("suhu", 0.0, 80.0, vec![]);
        assert!(VariableTable::new(vec![bare]).is_err());
    }

    #[test]
    fn kind_and_shape_must_agree() {
        let mixed = Variable::numeric(
            "suhu",
            0.0,
            80.0,
            vec![FuzzySet::new(
                "dingin",
                SetShape::Categorical {
                    value: "dingin".to_string(),
                },
            )],
        );
        assert!(VariableTable::new(vec![mixed]).is_err());

        let mixed = Variable::categorical(
            "bau",
            vec![FuzzySet::new(
                "menyengat",
                SetShape::RampHigh {
                    foot: 6.0,
                    shoulder: 8.0,
                },
            )],
        );
        assert!(VariableTable::new(vec![mixed]).is_err());
    }

    #[test]
    fn bands_must_ascend_and_cover_the_universe() {
        let mut bad = status();
        if let VariableKind::Scored(spec) = &mut bad.kind {
            spec.bands = vec![
                QualityBand::new(75.0, "Sedang"),
                QualityBand::new(45.0, "Buruk"),
            ];
        }
        assert!(VariableTable::new(vec![bad]).is_err());

        let mut short = status();
        if let VariableKind::Scored(spec) = &mut short.kind {
            spec.bands = vec![QualityBand::new(45.0, "Buruk")];
        }
        assert!(VariableTable::new(vec![short]).is_err());
    }

    #[test]
    fn overrides_must_reference_known_labels() {
        let mut scored = status();
        if let VariableKind::Scored(spec) = &mut scored.kind {
            spec.overrides = vec![LabelOverride {
                variable: "bau".to_string(),
                label: "menyengat".to_string(),
                min_membership: 1.0,
                forced_label: "Buruk (Indikasi Pembusukan)".to_string(),
                score_cap: 40.0,
            }];
        }
        // No `bau` variable in the table.
        assert!(VariableTable::new(vec![scored.clone()]).is_err());

        let bau = Variable::numeric(
            "bau",
            0.0,
            10.0,
            vec![FuzzySet::new(
                "menyengat",
                SetShape::RampHigh {
                    foot: 6.0,
                    shoulder: 8.0,
                },
            )],
        );
        assert!(VariableTable::new(vec![scored, bau]).is_ok());
    }

    #[test]
    fn clamp_resolves_nan_to_the_lower_bound() {
        let v = suhu();
        assert_eq!(v.clamp(f64::NAN), 0.0);
        assert_eq!(v.clamp(-5.0), 0.0);
        assert_eq!(v.clamp(120.0), 80.0);
        assert_eq!(v.clamp(27.25), 27.25);
        assert_eq!(v.clamp(f64::INFINITY), 80.0);
    }

    #[test]
    fn concluded_labels_match_themselves() {
        let v = Variable::concluded("Masalah_Deteksi", &["Anaerobik", "Kontaminasi"]);
        assert_eq!(v.terms.len(), 2);
        let term = v.term("Anaerobik").unwrap();
        assert_eq!(term.shape.membership_text("Anaerobik"), 1.0);
        assert_eq!(term.shape.membership_text("Kontaminasi"), 0.0);
        assert!(VariableTable::new(vec![v]).is_ok());
    }
}
