//! FILENAME: core/group-engine/src/definition.rs
//! Grouping Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a grouping:
//! which fields bucket the rows, how each field folds into its parent group,
//! and how sibling groups are ordered.
//! These structures are designed to be:
//! - Serializable (sent from the host as JSON)
//! - Validated on construction (a policy can never hold a conflicting field)
//! - Immutable snapshots of user intent

use std::cmp::Ordering;
use std::fmt;

use model::compare_values;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::GroupError;
use crate::tree::TreeRow;

/// Field that receives the group label when none is configured.
pub const DEFAULT_LABEL_FIELD: &str = "expand";

// ============================================================================
// AGGREGATION
// ============================================================================

/// How a field's values are combined into the parent group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationMode {
    /// Plain floating-point addition.
    Sum,
    /// Exact decimal addition.
    PreciseSum,
    /// The shared value when every child agrees, otherwise blank.
    EqualOrBlank,
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationMode::Sum => "sum",
            AggregationMode::PreciseSum => "precise-sum",
            AggregationMode::EqualOrBlank => "equal-or-blank",
        };
        f.write_str(name)
    }
}

/// Wire shape of an aggregation policy: one field list per mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateKeys {
    #[serde(default, rename = "addkeys")]
    pub add_keys: Vec<String>,

    #[serde(default, rename = "addBNkeys")]
    pub add_bn_keys: Vec<String>,

    #[serde(default, rename = "equalKeys")]
    pub equal_keys: Vec<String>,
}

/// Validated per-field aggregation policy.
///
/// Every field belongs to at most one mode. Lists keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AggregateKeys", into = "AggregateKeys")]
pub struct AggregationPolicy {
    sum: Vec<String>,
    precise_sum: Vec<String>,
    equal: Vec<String>,
    modes: FxHashMap<String, AggregationMode>,
}

impl AggregationPolicy {
    /// A policy that aggregates nothing (groups still get a leaf count).
    pub fn new() -> Self {
        AggregationPolicy::default()
    }

    /// Builds a policy, rejecting fields listed under more than one mode.
    pub fn from_keys(keys: AggregateKeys) -> Result<Self, GroupError> {
        let mut policy = AggregationPolicy::new();
        let lists = [
            (AggregationMode::Sum, keys.add_keys),
            (AggregationMode::PreciseSum, keys.add_bn_keys),
            (AggregationMode::EqualOrBlank, keys.equal_keys),
        ];

        for (mode, fields) in lists {
            for field in fields {
                match policy.modes.get(&field) {
                    Some(&existing) if existing == mode => continue,
                    Some(&existing) => {
                        return Err(GroupError::ConflictingAggregation {
                            field,
                            first: existing,
                            second: mode,
                        });
                    }
                    None => policy.push(field, mode),
                }
            }
        }

        Ok(policy)
    }

    /// Chainable helper for code-built policies; moves the field if present.
    pub fn with(mut self, field: impl Into<String>, mode: AggregationMode) -> Self {
        self.set_mode(field, mode);
        self
    }

    /// The mode governing `field`, if any.
    pub fn mode_of(&self, field: &str) -> Option<AggregationMode> {
        self.modes.get(field).copied()
    }

    /// Fields aggregated with `mode`, in insertion order.
    pub fn fields(&self, mode: AggregationMode) -> &[String] {
        match mode {
            AggregationMode::Sum => &self.sum,
            AggregationMode::PreciseSum => &self.precise_sum,
            AggregationMode::EqualOrBlank => &self.equal,
        }
    }

    /// Every governed field with its mode: sum fields first, then
    /// precise-sum, then equal-or-blank.
    pub fn entries(&self) -> impl Iterator<Item = (&str, AggregationMode)> + '_ {
        let sum = self.sum.iter().map(|f| (f.as_str(), AggregationMode::Sum));
        let precise = self
            .precise_sum
            .iter()
            .map(|f| (f.as_str(), AggregationMode::PreciseSum));
        let equal = self
            .equal
            .iter()
            .map(|f| (f.as_str(), AggregationMode::EqualOrBlank));
        sum.chain(precise).chain(equal)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Assigns `field` to `mode`, removing it from any other list first.
    pub fn set_mode(&mut self, field: impl Into<String>, mode: AggregationMode) {
        let field = field.into();
        if self.mode_of(&field) == Some(mode) {
            return;
        }
        self.remove_field(&field);
        self.push(field, mode);
    }

    /// Stops aggregating `field`. Returns the mode it had.
    pub fn remove_field(&mut self, field: &str) -> Option<AggregationMode> {
        let mode = self.modes.remove(field)?;
        self.list_mut(mode).retain(|f| f != field);
        Some(mode)
    }

    fn push(&mut self, field: String, mode: AggregationMode) {
        self.list_mut(mode).push(field.clone());
        self.modes.insert(field, mode);
    }

    fn list_mut(&mut self, mode: AggregationMode) -> &mut Vec<String> {
        match mode {
            AggregationMode::Sum => &mut self.sum,
            AggregationMode::PreciseSum => &mut self.precise_sum,
            AggregationMode::EqualOrBlank => &mut self.equal,
        }
    }
}

impl TryFrom<AggregateKeys> for AggregationPolicy {
    type Error = GroupError;

    fn try_from(keys: AggregateKeys) -> Result<Self, Self::Error> {
        AggregationPolicy::from_keys(keys)
    }
}

impl From<AggregationPolicy> for AggregateKeys {
    fn from(policy: AggregationPolicy) -> Self {
        AggregateKeys {
            add_keys: policy.sum,
            add_bn_keys: policy.precise_sum,
            equal_keys: policy.equal,
        }
    }
}

// ============================================================================
// GROUP SPEC
// ============================================================================

/// Which fields bucket the rows, and how rows and groups are identified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpec {
    /// Group-by fields, outermost first.
    pub group_keys: Vec<String>,

    /// Field that uniquely identifies a source row.
    pub row_key_field: String,

    /// Field under which a group row exposes its label.
    #[serde(default = "default_label_field")]
    pub label_field: String,
}

fn default_label_field() -> String {
    DEFAULT_LABEL_FIELD.to_string()
}

impl GroupSpec {
    pub fn new(group_keys: Vec<String>, row_key_field: impl Into<String>) -> Self {
        GroupSpec {
            group_keys,
            row_key_field: row_key_field.into(),
            label_field: default_label_field(),
        }
    }

    pub fn with_label_field(mut self, label_field: impl Into<String>) -> Self {
        self.label_field = label_field.into();
        self
    }

    /// True when no grouping applies and rows pass through flat.
    pub fn is_flat(&self) -> bool {
        self.group_keys.is_empty()
    }

    pub fn validate(&self) -> Result<(), GroupError> {
        if self.row_key_field.is_empty() {
            return Err(GroupError::EmptyRowKeyField);
        }
        Ok(())
    }
}

// ============================================================================
// SIBLING ORDER
// ============================================================================

/// Sort order for sibling rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Ascending,
    Descending,
    /// Keep original order (order of first appearance)
    DataSourceOrder,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::DataSourceOrder
    }
}

/// A declarative sibling comparator: order every sibling list by one field.
///
/// For a group row the field resolves to its group value when it is the
/// row's own group key, else to its aggregate; for a leaf, to the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSort {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl GroupSort {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        GroupSort {
            field: field.into(),
            order,
        }
    }

    pub fn compare(&self, a: &TreeRow, b: &TreeRow) -> Ordering {
        match self.order {
            SortOrder::Ascending => {
                compare_values(a.sort_value(&self.field), b.sort_value(&self.field))
            }
            SortOrder::Descending => {
                compare_values(b.sort_value(&self.field), a.sort_value(&self.field))
            }
            SortOrder::DataSourceOrder => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_keys() {
        let policy = AggregationPolicy::from_keys(AggregateKeys {
            add_keys: vec!["qty".into()],
            add_bn_keys: vec!["pv".into(), "pv".into()],
            equal_keys: vec!["ccy".into()],
        })
        .unwrap();

        assert_eq!(policy.mode_of("qty"), Some(AggregationMode::Sum));
        assert_eq!(policy.mode_of("pv"), Some(AggregationMode::PreciseSum));
        assert_eq!(policy.mode_of("ccy"), Some(AggregationMode::EqualOrBlank));
        assert_eq!(policy.mode_of("other"), None);
        assert_eq!(policy.fields(AggregationMode::PreciseSum), ["pv".to_string()]);
    }

    #[test]
    fn test_conflicting_fields_are_rejected() {
        let err = AggregationPolicy::from_keys(AggregateKeys {
            add_keys: vec!["pv".into()],
            add_bn_keys: vec!["pv".into()],
            equal_keys: vec![],
        })
        .unwrap_err();

        assert_eq!(
            err,
            GroupError::ConflictingAggregation {
                field: "pv".into(),
                first: AggregationMode::Sum,
                second: AggregationMode::PreciseSum,
            }
        );
    }

    #[test]
    fn test_set_mode_moves_field() {
        let mut policy = AggregationPolicy::new().with("pv", AggregationMode::Sum);
        policy.set_mode("pv", AggregationMode::PreciseSum);

        assert!(policy.fields(AggregationMode::Sum).is_empty());
        assert_eq!(policy.mode_of("pv"), Some(AggregationMode::PreciseSum));

        assert_eq!(policy.remove_field("pv"), Some(AggregationMode::PreciseSum));
        assert_eq!(policy.remove_field("pv"), None);
        assert!(policy.is_empty());
    }

    #[test]
    fn test_policy_json_shape() {
        let policy: AggregationPolicy =
            serde_json::from_str(r#"{"addBNkeys":["pv"],"equalKeys":["ccy"]}"#).unwrap();
        assert_eq!(policy.mode_of("pv"), Some(AggregationMode::PreciseSum));

        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"addkeys": [], "addBNkeys": ["pv"], "equalKeys": ["ccy"]})
        );

        let conflict =
            serde_json::from_str::<AggregationPolicy>(r#"{"addkeys":["a"],"equalKeys":["a"]}"#);
        assert!(conflict.is_err());
    }

    #[test]
    fn test_group_spec_validation() {
        let spec = GroupSpec::new(vec!["inst".into()], "pos");
        assert_eq!(spec.label_field, DEFAULT_LABEL_FIELD);
        assert!(spec.validate().is_ok());
        assert!(!spec.is_flat());

        let bad = GroupSpec::new(vec![], "");
        assert_eq!(bad.validate(), Err(GroupError::EmptyRowKeyField));
    }
}
