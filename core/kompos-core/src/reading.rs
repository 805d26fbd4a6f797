//! Observation readings consumed by inference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw observation value: numeric for continuous variables, text for
/// categorical ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// A single observation instance: variable name → raw value.
///
/// Created once per inference request and never mutated afterwards.
/// Variables a rule references but the reading omits simply contribute zero
/// membership; partial readings are legitimate input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reading {
    values: BTreeMap<String, Value>,
}

impl Reading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, variable: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(variable, value);
        self
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(variable.into(), value.into());
    }

    pub fn get(&self, variable: &str) -> Option<&Value> {
        self.values.get(variable)
    }

    /// Numeric value for a variable, if present and numeric.
    pub fn number(&self, variable: &str) -> Option<f64> {
        match self.values.get(variable) {
            Some(Value::Number(x)) => Some(*x),
            _ => None,
        }
    }

    /// Text value for a variable, if present and textual.
    pub fn text(&self, variable: &str) -> Option<&str> {
        match self.values.get(variable) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for Reading {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_mixed_values() {
        let reading = Reading::new()
            .with("suhu", 27.25)
            .with("bau", "Bau Busuk");
        assert_eq!(reading.number("suhu"), Some(27.25));
        assert_eq!(reading.text("bau"), Some("Bau Busuk"));
        assert_eq!(reading.number("bau"), None);
        assert_eq!(reading.get("ph"), None);
        assert_eq!(reading.len(), 2);
    }

    #[test]
    fn readings_round_trip_as_flat_json() {
        let reading = Reading::new()
            .with("suhu", 27.25)
            .with("material", "Campuran");
        let json = serde_json::to_string(&reading).unwrap();
        assert_eq!(json, r#"{"material":"Campuran","suhu":27.25}"#);
        let back: Reading = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reading);
    }
}
