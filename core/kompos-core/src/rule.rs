//! Rule records and the rule table.
//!
//! Rules reference variables and labels by name. Structural checks (weight
//! range, non-empty clauses) live here; reference resolution against a
//! variable table happens when the engine compiles the rule table, so a
//! typo in a label is a load-time error rather than a silently dead rule.

use serde::{Deserialize, Serialize};

use crate::{KomposError, Result};

/// Antecedent combinator: AND takes the minimum antecedent membership,
/// OR the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

/// One antecedent condition: a variable and the label required on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub variable: String,
    pub label: String,
}

/// One consequent: an output variable and the label concluded on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consequent {
    pub variable: String,
    pub label: String,
}

/// A single inference rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub antecedents: Vec<Condition>,
    pub consequents: Vec<Consequent>,
    #[serde(default)]
    pub combinator: Combinator,
    /// Certainty factor attached to the rule's conclusions.
    pub weight: f64,
    /// Safety rules fire on their strongest antecedent regardless of the
    /// combinator and are evaluated before ordinary rules.
    #[serde(default)]
    pub is_override: bool,
}

impl Rule {
    /// New AND-rule with weight 1.0 and no clauses.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            antecedents: Vec::new(),
            consequents: Vec::new(),
            combinator: Combinator::And,
            weight: 1.0,
            is_override: false,
        }
    }

    /// Adds an antecedent condition.
    pub fn when(mut self, variable: impl Into<String>, label: impl Into<String>) -> Self {
        self.antecedents.push(Condition {
            variable: variable.into(),
            label: label.into(),
        });
        self
    }

    /// Adds a consequent.
    pub fn then(mut self, variable: impl Into<String>, label: impl Into<String>) -> Self {
        self.consequents.push(Consequent {
            variable: variable.into(),
            label: label.into(),
        });
        self
    }

    pub fn with_combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Marks the rule as a safety override.
    pub fn as_override(mut self) -> Self {
        self.is_override = true;
        self
    }

    /// Structural well-formedness, independent of any variable table.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| {
            Err(KomposError::InvalidRule {
                rule_id: self.id.clone(),
                reason,
            })
        };
        if self.id.is_empty() {
            return fail("rule id must not be empty".to_string());
        }
        if self.antecedents.is_empty() {
            return fail("rule has no antecedents".to_string());
        }
        if self.consequents.is_empty() {
            return fail("rule has no consequents".to_string());
        }
        if !self.weight.is_finite() || !(0.0..=1.0).contains(&self.weight) {
            return fail(format!("weight {} must be in [0, 1]", self.weight));
        }
        Ok(())
    }
}

/// Ordered sequence of rules. Order is kept for reproducible iteration;
/// aggregation is commutative, so it never changes a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
