//! Fuzzification: raw readings to degree-of-membership grids.

use std::collections::BTreeMap;

use kompos_core::{Reading, Value, Variable, VariableKind, VariableTable};
use tracing::warn;

/// Membership degrees for one reading, aligned to a variable table: row i
/// holds the degrees of table variable i in term order, or `None` when the
/// reading did not cover that variable.
///
/// Lookups never fail: absent variables and unknown indices read as degree
/// 0, which is exactly the strength a rule over them should see.
#[derive(Debug, Clone, PartialEq)]
pub struct Memberships {
    rows: Vec<Option<Vec<f64>>>,
}

impl Memberships {
    /// Degree of `term` on `variable`, by table index. 0 when absent.
    pub fn degree(&self, variable: usize, term: usize) -> f64 {
        self.rows
            .get(variable)
            .and_then(|row| row.as_ref())
            .and_then(|row| row.get(term))
            .copied()
            .unwrap_or(0.0)
    }

    /// True when the reading covered the variable at this index.
    pub fn is_present(&self, variable: usize) -> bool {
        self.rows
            .get(variable)
            .map_or(false, |row| row.is_some())
    }

    /// Degree looked up by names. 0 for anything unknown or absent.
    pub fn degree_of(&self, table: &VariableTable, variable: &str, label: &str) -> f64 {
        let Some(vi) = table.index_of(variable) else {
            return 0.0;
        };
        let Some(ti) = table.by_index(vi).term_index(label) else {
            return 0.0;
        };
        self.degree(vi, ti)
    }

    /// Name-keyed view, omitting variables absent from the reading.
    pub fn to_map(&self, table: &VariableTable) -> BTreeMap<String, BTreeMap<String, f64>> {
        let mut map = BTreeMap::new();
        for (vi, variable) in table.iter().enumerate() {
            let Some(Some(row)) = self.rows.get(vi) else {
                continue;
            };
            let degrees = variable
                .terms
                .iter()
                .zip(row)
                .map(|(term, degree)| (term.label.clone(), *degree))
                .collect();
            map.insert(variable.name.clone(), degrees);
        }
        map
    }
}

/// Evaluates every term of every covered variable against the reading.
///
/// Dispatch follows the variable's declared kind: numeric inputs take
/// numeric values (clamped into the universe first), categorical inputs
/// take text. A value of the wrong kind counts as absent. Scored outputs
/// are never fuzzified from readings; concluded outputs accept text so a
/// previous pass's conclusions can be fed back in.
pub fn fuzzify(table: &VariableTable, reading: &Reading) -> Memberships {
    let rows = table
        .iter()
        .map(|variable| fuzzify_variable(variable, reading.get(&variable.name)))
        .collect();
    Memberships { rows }
}

fn fuzzify_variable(variable: &Variable, value: Option<&Value>) -> Option<Vec<f64>> {
    match (&variable.kind, value?) {
        (VariableKind::Numeric { min, max }, Value::Number(x)) => {
            let clamped = variable.clamp(*x);
            if x.is_nan() {
                warn!(
                    "reading for `{}` is NaN, clamped to universe minimum {min}",
                    variable.name
                );
            } else if clamped != *x {
                warn!(
                    "reading for `{}` ({x}) outside universe [{min}, {max}], clamped",
                    variable.name
                );
            }
            Some(
                variable
                    .terms
                    .iter()
                    .map(|term| term.shape.membership(clamped))
                    .collect(),
            )
        }
        (VariableKind::Categorical | VariableKind::Concluded, Value::Text(s)) => Some(
            variable
                .terms
                .iter()
                .map(|term| term.shape.membership_text(s))
                .collect(),
        ),
        _ => None,
    }
}
