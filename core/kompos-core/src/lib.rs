//! # Kompos Core
//!
//! Data model for the kompos fuzzy rule-inference engine: fuzzy set shapes
//! and membership evaluation, input/output variables, observation readings,
//! inference rules, and result records.
//!
//! This crate holds plain, serializable data. The inference pipeline that
//! consumes it lives in `kompos-fuzzy`:
//!
//! - Fuzzy sets are tagged shapes evaluated into membership degrees
//! - Variables group labeled sets over one sensor or conclusion dimension
//! - Rules reference variables and labels by name; references are validated
//!   when an engine is built, never during inference
//! - Readings and reports are the per-invocation boundary types

pub mod reading;
pub mod report;
pub mod rule;
pub mod set;
pub mod variable;

pub use reading::{Reading, Value};
pub use report::{InferenceReport, OutputResult, QualityScore};
pub use rule::{Combinator, Condition, Consequent, Rule, RuleTable};
pub use set::{round_dp, FuzzySet, SetShape, MEMBERSHIP_DECIMALS};
pub use variable::{
    LabelOverride, QualityBand, ScoringSpec, Variable, VariableKind, VariableTable,
};

/// Core error type for configuration validation.
///
/// Inference itself is total: once a variable table and rule table have
/// validated, evaluating a reading cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum KomposError {
    #[error("duplicate variable `{name}`")]
    DuplicateVariable { name: String },
    #[error("variable `{variable}`: {reason}")]
    InvalidVariable { variable: String, reason: String },
    #[error("variable `{variable}`, set `{label}`: {reason}")]
    InvalidSet {
        variable: String,
        label: String,
        reason: String,
    },
    #[error("duplicate rule `{id}`")]
    DuplicateRule { id: String },
    #[error("rule `{rule_id}`: {reason}")]
    InvalidRule { rule_id: String, reason: String },
    #[error("rule `{rule_id}` references unknown variable `{variable}`")]
    UnknownVariable { rule_id: String, variable: String },
    #[error("rule `{rule_id}` references unknown label `{label}` on variable `{variable}`")]
    UnknownLabel {
        rule_id: String,
        variable: String,
        label: String,
    },
}

/// Result type alias for kompos operations.
pub type Result<T> = std::result::Result<T, KomposError>;

/// Version information for kompos core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
