//! FILENAME: core/table-engine/src/fields.rs
//! Field Choices - What a group manager may still offer.
//!
//! Candidate fields are the distinct leaf dataIndex values of the column
//! tree, hidden columns included, in column order. Each picker removes the
//! fields already in use:
//! - group keys: not yet grouped
//! - sum keys: in no aggregation list, and numeric in the sampled rows
//! - equal keys: in no aggregation list

use column_engine::{extract_leaves, ColumnNode};
use group_engine::AggregationPolicy;
use model::{is_numeric_field, Record};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::definition::TableDefinition;

/// Fields a group manager can still add, per picker.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChoices {
    pub group_keys: Vec<String>,
    /// Offered for both sum and precise-sum.
    pub sum_keys: Vec<String>,
    pub equal_keys: Vec<String>,
}

/// Distinct leaf dataIndex values, first occurrence wins.
pub fn available_fields(columns: &[ColumnNode]) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut fields = Vec::new();
    for leaf in extract_leaves(columns) {
        if seen.insert(leaf.data_index.as_str()) {
            fields.push(leaf.data_index.clone());
        }
    }
    fields
}

pub fn available_group_keys(columns: &[ColumnNode], group_keys: &[String]) -> Vec<String> {
    available_fields(columns)
        .into_iter()
        .filter(|field| !group_keys.contains(field))
        .collect()
}

pub fn available_sum_keys(
    columns: &[ColumnNode],
    rows: &[Record],
    policy: Option<&AggregationPolicy>,
) -> Vec<String> {
    available_fields(columns)
        .into_iter()
        .filter(|field| !is_aggregated(policy, field) && is_numeric_field(rows, field))
        .collect()
}

pub fn available_equal_keys(
    columns: &[ColumnNode],
    policy: Option<&AggregationPolicy>,
) -> Vec<String> {
    available_fields(columns)
        .into_iter()
        .filter(|field| !is_aggregated(policy, field))
        .collect()
}

fn is_aggregated(policy: Option<&AggregationPolicy>, field: &str) -> bool {
    policy.is_some_and(|policy| policy.mode_of(field).is_some())
}

impl TableDefinition {
    /// Field choices for this definition against a sample of `rows`.
    pub fn field_choices(&self, rows: &[Record]) -> FieldChoices {
        let policy = self.aggregate_keys.as_ref();
        FieldChoices {
            group_keys: available_group_keys(&self.columns, &self.group_keys),
            sum_keys: available_sum_keys(&self.columns, rows, policy),
            equal_keys: available_equal_keys(&self.columns, policy),
        }
    }
}
