//! # Kompos Fuzzy
//!
//! Fuzzy rule-inference engine for compost monitoring: turns raw sensor
//! and observation readings into a crisp quality score and CF-weighted
//! diagnostic conclusions.
//!
//! ## Features
//!
//! - **Fuzzification**: membership evaluation of numeric and categorical
//!   readings against a validated variable table
//! - **Rule evaluation**: Mamdani AND/OR firing strengths with per-rule
//!   certainty factors and safety override rules
//! - **Scored outputs**: max aggregation, discretized centroid
//!   defuzzification, quality bands and hazard label overrides
//! - **Concluded outputs**: certainty-factor combination per conclusion,
//!   order independent
//! - **Presets**: the two field deployments, validated and ready to run
//!
//! ## Example
//!
//! ```
//! use kompos_core::Reading;
//! use kompos_fuzzy::presets;
//!
//! # fn main() -> kompos_core::Result<()> {
//! let engine = presets::compost_quality()?;
//! let reading = Reading::new()
//!     .with("suhu", 27.25)
//!     .with("kelembapan", 46.0)
//!     .with("ph", 5.82)
//!     .with("ammonia", 5.0)
//!     .with("bau", presets::odor_level("Tidak Bau"));
//!
//! let report = engine.infer(&reading);
//! let score = report.score("status_kompos").unwrap();
//! assert!(score.conclusive);
//! assert_eq!(score.label.as_deref(), Some("Baik"));
//! # Ok(())
//! # }
//! ```

pub mod combine;
pub mod defuzz;
pub mod engine;
pub mod fuzzify;
pub mod presets;
pub mod rules;
pub mod score;

pub use combine::{combine_cf, max_strength};
pub use defuzz::defuzzify;
pub use engine::FuzzyEngine;
pub use fuzzify::{fuzzify, Memberships};
pub use rules::{evaluate, CompiledRules, Contributions};
pub use score::{apply_override, classify};
