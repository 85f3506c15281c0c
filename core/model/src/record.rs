//! FILENAME: core/model/src/record.rs
//! PURPOSE: A single flat input row.
//! CONTEXT: Records are opaque field-name -> value maps supplied by the host.
//! The engines only read them; grouping places each record, unchanged, as a
//! leaf of the tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// How many leading rows `is_numeric_field` inspects.
const NUMERIC_SAMPLE_SIZE: usize = 10;

/// One input row: field name -> value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Record {
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Checks if a field contains primarily numeric values.
///
/// Looks at the first few rows only. Returns true if more than 50% of the
/// present, non-null values are numeric, and also when no sampled row carries
/// the field at all.
pub fn is_numeric_field(rows: &[Record], field: &str) -> bool {
    let mut numeric_count = 0usize;
    let mut total_count = 0usize;

    for row in rows.iter().take(NUMERIC_SAMPLE_SIZE) {
        match row.get(field) {
            None | Some(FieldValue::Null) => continue,
            Some(value) => {
                total_count += 1;
                if value.is_numeric() {
                    numeric_count += 1;
                }
            }
        }
    }

    if total_count == 0 {
        return true;
    }

    (numeric_count as f64 / total_count as f64) > 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let record = Record::new().with("pos", "1").with("pv", 10000.0);
        assert_eq!(record.get("pos"), Some(&FieldValue::text("1")));
        assert_eq!(record.get("pv"), Some(&FieldValue::Number(10000.0)));
        assert!(record.get("missing").is_none());
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_from_iter() {
        let record: Record = [("a", FieldValue::Null), ("b", FieldValue::from(2.0))]
            .into_iter()
            .collect();
        assert!(record.contains("a"));
        assert_eq!(record.fields().count(), 2);
    }

    #[test]
    fn test_is_numeric_field() {
        let rows = vec![
            Record::new().with("pv", 1.0).with("ccy", "USD"),
            Record::new().with("pv", "2.5").with("ccy", "EUR"),
            Record::new().with("pv", "n/a"),
        ];
        assert!(is_numeric_field(&rows, "pv"));
        assert!(!is_numeric_field(&rows, "ccy"));
        // No row carries it: treated as numeric.
        assert!(is_numeric_field(&rows, "qty"));
        assert!(is_numeric_field(&[], "pv"));
    }

    #[test]
    fn test_is_numeric_field_samples_leading_rows_only() {
        let mut rows: Vec<Record> = (0..10).map(|_| Record::new().with("x", "text")).collect();
        rows.extend((0..50).map(|i| Record::new().with("x", i as f64)));
        assert!(!is_numeric_field(&rows, "x"));
    }

    #[test]
    fn test_json_round_trip() {
        let record: Record =
            serde_json::from_str(r#"{"pos":"1","inst":"AAPL","pv":10000,"note":null}"#).unwrap();
        assert_eq!(record.get("pv"), Some(&FieldValue::Number(10000.0)));
        assert_eq!(record.get("note"), Some(&FieldValue::Null));
        let back: Record = serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(back, record);
    }
}
