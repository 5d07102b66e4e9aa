//! Schema-conformant record assembly.
//!
//! [`assemble`] turns an arbitrary name -> value mapping into a
//! [`FeatureRecord`] holding exactly the names of the [`ExpectedSchema`], in
//! schema order. Names the schema does not know are dropped; schema names the
//! mapping does not provide are filled with `0`, i.e. the risk factor is
//! assumed absent.

use crate::schema::ExpectedSchema;
use log::debug;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A single numeric feature. BMI is the only float the form produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Int(i64),
    Float(f64),
}

impl FeatureValue {
    pub const ZERO: FeatureValue = FeatureValue::Int(0);

    pub fn as_f64(self) -> f64 {
        match self {
            FeatureValue::Int(v) => v as f64,
            FeatureValue::Float(v) => v,
        }
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Int(i64::from(v))
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Loose name -> value mapping, e.g. base answers plus derived features.
pub type FeatureMap = BTreeMap<String, FeatureValue>;

/// One row for the classifier, aligned with its expected schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    schema: ExpectedSchema,
    values: Vec<FeatureValue>,
}

impl FeatureRecord {
    pub fn schema(&self) -> &ExpectedSchema {
        &self.schema
    }

    pub fn names(&self) -> &[String] {
        self.schema.names()
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.schema.position(name).map(|idx| self.values[idx])
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> + '_ {
        self.schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Positional numeric row, as a linear model consumes it.
    pub fn to_row(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.as_f64()).collect()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Build the record for `schema` from `base_values`.
///
/// Entries of `base_values` whose name is not in the schema are ignored, so
/// callers may pass a superset (all answers plus every derived feature).
pub fn assemble(schema: &ExpectedSchema, base_values: &FeatureMap) -> FeatureRecord {
    let mut values = vec![FeatureValue::ZERO; schema.len()];
    for (name, value) in base_values {
        match schema.position(name) {
            Some(idx) => values[idx] = *value,
            None => debug!("dropping '{name}': not part of the expected schema"),
        }
    }
    FeatureRecord {
        schema: schema.clone(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema(names: &[&str]) -> ExpectedSchema {
        ExpectedSchema::new(names.iter().map(|n| n.to_string()).collect()).unwrap()
    }

    fn map(entries: &[(&str, FeatureValue)]) -> FeatureMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn missing_names_default_to_zero() {
        let s = schema(&["HighBP", "Age", "BMI"]);
        let record = assemble(&s, &FeatureMap::new());
        assert_eq!(record.values(), &[FeatureValue::ZERO; 3]);
    }

    #[test]
    fn unknown_names_are_dropped_and_order_follows_schema() {
        let s = schema(&["BMI", "HighBP"]);
        let record = assemble(
            &s,
            &map(&[
                ("HighBP", FeatureValue::Int(1)),
                ("BMI", FeatureValue::Float(31.2)),
                ("Income", FeatureValue::Int(5)),
            ]),
        );
        let pairs: Vec<_> = record.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("BMI", FeatureValue::Float(31.2)),
                ("HighBP", FeatureValue::Int(1)),
            ]
        );
        assert_eq!(record.get("Income"), None);
    }

    #[test]
    fn values_are_not_clamped() {
        let s = schema(&["MentHlth"]);
        let record = assemble(&s, &map(&[("MentHlth", FeatureValue::Int(45))]));
        assert_eq!(record.get("MentHlth"), Some(FeatureValue::Int(45)));
    }

    #[test]
    fn serializes_in_schema_order() {
        let s = schema(&["Sex", "BMI", "Age"]);
        let record = assemble(
            &s,
            &map(&[
                ("Age", FeatureValue::Int(7)),
                ("BMI", FeatureValue::Float(22.5)),
            ]),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Sex":0,"BMI":22.5,"Age":7}"#);
        assert_eq!(record.to_row(), vec![0.0, 22.5, 7.0]);
    }
}
