//! The inference engine façade.

use std::collections::BTreeMap;

use kompos_core::{
    InferenceReport, LabelOverride, OutputResult, QualityScore, Reading, Result, RuleTable,
    Variable, VariableKind, VariableTable,
};
use tracing::{debug, info};

use crate::combine::{combine_cf, max_strength};
use crate::defuzz::defuzzify;
use crate::fuzzify::fuzzify;
use crate::rules::{evaluate, CompiledRules};
use crate::score::{apply_override, classify};

/// Label override with its watched input resolved to table indices.
#[derive(Debug, Clone)]
struct ResolvedOverride {
    variable: usize,
    term: usize,
    rule: LabelOverride,
}

#[derive(Debug, Clone)]
struct ScoredOutput {
    index: usize,
    overrides: Vec<ResolvedOverride>,
}

/// A validated fuzzy inference engine: variable table plus compiled rules.
///
/// Construction is the only fallible step. An engine holds no mutable
/// state and performs no I/O, so one instance serves any number of
/// concurrent `infer` calls; swap in a new engine to change configuration.
#[derive(Debug, Clone)]
pub struct FuzzyEngine {
    variables: VariableTable,
    rules: CompiledRules,
    scored: Vec<ScoredOutput>,
    concluded: Vec<usize>,
}

impl FuzzyEngine {
    /// Validates the variable table, compiles the rule table against it,
    /// and resolves the output layout.
    pub fn new(variables: Vec<Variable>, rules: RuleTable) -> Result<Self> {
        let table = VariableTable::new(variables)?;
        let compiled = CompiledRules::compile(&table, &rules)?;

        let mut scored = Vec::new();
        let mut concluded = Vec::new();
        for (index, variable) in table.iter().enumerate() {
            match &variable.kind {
                VariableKind::Scored(spec) => scored.push(ScoredOutput {
                    index,
                    overrides: resolve_overrides(&table, &spec.overrides),
                }),
                VariableKind::Concluded => concluded.push(index),
                _ => {}
            }
        }

        info!(
            "fuzzy engine ready: {} variables, {} rules, {} outputs",
            table.len(),
            compiled.len(),
            scored.len() + concluded.len()
        );
        Ok(Self {
            variables: table,
            rules: compiled,
            scored,
            concluded,
        })
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    /// Runs one reading through the full pipeline: fuzzify, evaluate,
    /// aggregate, defuzzify and band scored outputs, CF-combine concluded
    /// outputs. Total: a validated engine cannot fail on any reading.
    pub fn infer(&self, reading: &Reading) -> InferenceReport {
        let memberships = fuzzify(&self.variables, reading);
        let contributions = evaluate(&memberships, &self.rules);

        let mut outputs = BTreeMap::new();
        for output in &self.scored {
            let variable = self.variables.by_index(output.index);
            let VariableKind::Scored(spec) = &variable.kind else {
                continue;
            };
            let aggregated: Vec<f64> = (0..variable.terms.len())
                .map(|ti| max_strength(contributions.get(output.index, ti)))
                .collect();
            let mut verdict = match defuzzify(variable, spec, &aggregated) {
                Some(value) => QualityScore {
                    value,
                    label: Some(classify(spec, value).to_string()),
                    conclusive: true,
                },
                None => QualityScore::inconclusive(),
            };
            for o in &output.overrides {
                apply_override(&o.rule, memberships.degree(o.variable, o.term), &mut verdict);
            }
            outputs.insert(variable.name.clone(), OutputResult::Score(verdict));
        }

        for &index in &self.concluded {
            let variable = self.variables.by_index(index);
            let mut conclusions = BTreeMap::new();
            for (ti, term) in variable.terms.iter().enumerate() {
                let recorded = contributions.get(index, ti);
                if recorded.is_empty() {
                    continue;
                }
                conclusions.insert(term.label.clone(), combine_cf(recorded));
            }
            outputs.insert(variable.name.clone(), OutputResult::Conclusions(conclusions));
        }

        debug!("inference produced {} outputs", outputs.len());
        InferenceReport { outputs }
    }
}

fn resolve_overrides(table: &VariableTable, overrides: &[LabelOverride]) -> Vec<ResolvedOverride> {
    // Table validation already checked these references resolve.
    overrides
        .iter()
        .filter_map(|rule| {
            let variable = table.index_of(&rule.variable)?;
            let term = table.by_index(variable).term_index(&rule.label)?;
            Some(ResolvedOverride {
                variable,
                term,
                rule: rule.clone(),
            })
        })
        .collect()
}
