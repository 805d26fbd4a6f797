//! Rule compilation and firing-strength evaluation.
//!
//! Compilation resolves every (variable, label) reference to table indices
//! once, when the engine is built. Evaluation is then a pure pass over
//! index lookups: no string keys, no allocation beyond the contribution
//! lists, and no failure paths.

use std::collections::{BTreeMap, HashSet};

use kompos_core::{
    Combinator, KomposError, Result, Rule, RuleTable, VariableKind, VariableTable,
};
use tracing::{debug, trace};

use crate::fuzzify::Memberships;

#[derive(Debug, Clone, Copy)]
struct TermRef {
    variable: usize,
    term: usize,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    id: String,
    antecedents: Vec<TermRef>,
    consequents: Vec<TermRef>,
    combinator: Combinator,
    weight: f64,
}

/// A rule table validated and index-resolved against a variable table.
/// Override rules are partitioned out so they run first.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    overrides: Vec<CompiledRule>,
    ordinary: Vec<CompiledRule>,
}

impl CompiledRules {
    /// Validates and resolves `rules` against `table`.
    ///
    /// Fails on duplicate rule ids, structural defects, references to
    /// unknown variables or labels, consequents that name a non-output
    /// variable, and antecedents over scored outputs (which have no
    /// linguistic reading to match).
    pub fn compile(table: &VariableTable, rules: &RuleTable) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut overrides = Vec::new();
        let mut ordinary = Vec::new();

        for rule in rules.iter() {
            rule.validate()?;
            if !seen.insert(rule.id.as_str()) {
                return Err(KomposError::DuplicateRule {
                    id: rule.id.clone(),
                });
            }
            let compiled = compile_rule(table, rule)?;
            if rule.is_override {
                overrides.push(compiled);
            } else {
                ordinary.push(compiled);
            }
        }
        debug!(
            "compiled {} rules ({} overrides) against {} variables",
            overrides.len() + ordinary.len(),
            overrides.len(),
            table.len()
        );
        Ok(Self {
            overrides,
            ordinary,
        })
    }

    pub fn len(&self) -> usize {
        self.overrides.len() + self.ordinary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.ordinary.is_empty()
    }
}

fn compile_rule(table: &VariableTable, rule: &Rule) -> Result<CompiledRule> {
    let mut antecedents = Vec::with_capacity(rule.antecedents.len());
    for condition in &rule.antecedents {
        let reference = resolve(table, &rule.id, &condition.variable, &condition.label)?;
        let variable = table.by_index(reference.variable);
        if matches!(variable.kind, VariableKind::Scored(_)) {
            return Err(KomposError::InvalidRule {
                rule_id: rule.id.clone(),
                reason: format!(
                    "antecedent references scored output `{}`",
                    condition.variable
                ),
            });
        }
        antecedents.push(reference);
    }

    let mut consequents = Vec::with_capacity(rule.consequents.len());
    for consequent in &rule.consequents {
        let reference = resolve(table, &rule.id, &consequent.variable, &consequent.label)?;
        if !table.by_index(reference.variable).is_output() {
            return Err(KomposError::InvalidRule {
                rule_id: rule.id.clone(),
                reason: format!(
                    "consequent `{}` is not an output variable",
                    consequent.variable
                ),
            });
        }
        consequents.push(reference);
    }

    Ok(CompiledRule {
        id: rule.id.clone(),
        antecedents,
        consequents,
        combinator: rule.combinator,
        weight: rule.weight,
    })
}

fn resolve(table: &VariableTable, rule_id: &str, variable: &str, label: &str) -> Result<TermRef> {
    let vi = table
        .index_of(variable)
        .ok_or_else(|| KomposError::UnknownVariable {
            rule_id: rule_id.to_string(),
            variable: variable.to_string(),
        })?;
    let ti = table
        .by_index(vi)
        .term_index(label)
        .ok_or_else(|| KomposError::UnknownLabel {
            rule_id: rule_id.to_string(),
            variable: variable.to_string(),
            label: label.to_string(),
        })?;
    Ok(TermRef {
        variable: vi,
        term: ti,
    })
}

/// Weighted firing strengths recorded per (output variable, output term)
/// in rule order. Only fired rules contribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contributions {
    entries: BTreeMap<(usize, usize), Vec<f64>>,
}

const NO_CONTRIBUTIONS: &[f64] = &[];

impl Contributions {
    /// Contribution list for an output term, by table indices.
    pub fn get(&self, variable: usize, term: usize) -> &[f64] {
        self.entries
            .get(&(variable, term))
            .map_or(NO_CONTRIBUTIONS, Vec::as_slice)
    }

    /// Contribution list looked up by names; empty for anything unknown.
    pub fn named(&self, table: &VariableTable, variable: &str, label: &str) -> &[f64] {
        let Some(vi) = table.index_of(variable) else {
            return NO_CONTRIBUTIONS;
        };
        let Some(ti) = table.by_index(vi).term_index(label) else {
            return NO_CONTRIBUTIONS;
        };
        self.get(vi, ti)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, key: (usize, usize), value: f64) {
        self.entries.entry(key).or_default().push(value);
    }
}

/// Evaluates every rule against the membership grid.
///
/// Override rules run first with veto semantics: their firing strength is
/// the maximum antecedent membership whatever their combinator says, so a
/// single hazard indicator at full membership forces the contribution.
/// Ordinary rules follow their combinator (AND = min, OR = max). Missing
/// memberships read as 0; a rule only records contributions when its
/// strength is positive.
pub fn evaluate(memberships: &Memberships, rules: &CompiledRules) -> Contributions {
    let mut contributions = Contributions::default();
    for rule in &rules.overrides {
        let strength = combine_antecedents(memberships, &rule.antecedents, Combinator::Or);
        record_if_fired(&mut contributions, rule, strength);
    }
    for rule in &rules.ordinary {
        let strength = combine_antecedents(memberships, &rule.antecedents, rule.combinator);
        record_if_fired(&mut contributions, rule, strength);
    }
    contributions
}

fn combine_antecedents(
    memberships: &Memberships,
    antecedents: &[TermRef],
    combinator: Combinator,
) -> f64 {
    let degrees = antecedents
        .iter()
        .map(|a| memberships.degree(a.variable, a.term));
    match combinator {
        Combinator::And => degrees.fold(1.0, f64::min),
        Combinator::Or => degrees.fold(0.0, f64::max),
    }
}

fn record_if_fired(contributions: &mut Contributions, rule: &CompiledRule, strength: f64) {
    if strength <= 0.0 {
        return;
    }
    trace!("rule {} fired at {:.3}", rule.id, strength);
    for consequent in &rule.consequents {
        contributions.record(
            (consequent.variable, consequent.term),
            strength * rule.weight,
        );
    }
}
