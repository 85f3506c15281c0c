//! FILENAME: core/group-engine/src/aggregate.rs
//! Aggregation - Bottom-up fold of a built group tree.
//!
//! Every group is recomputed from its immediate children only: a leaf
//! contributes its record fields, a group child contributes the aggregates
//! that were just folded for it. Running the fold twice therefore yields the
//! same values.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::warn;
use model::{Decimal, FieldValue};

use crate::definition::{AggregationMode, AggregationPolicy};
use crate::tree::{Aggregates, GroupNode, TreeRow};

/// Orders two siblings. Applied to every sibling list, leaves included.
pub type SiblingComparator<'a> = &'a dyn Fn(&TreeRow, &TreeRow) -> Ordering;

// ============================================================================
// FIELD ACCUMULATOR
// ============================================================================

/// Running state for one aggregated field of one group.
#[derive(Debug, Clone, PartialEq)]
enum FieldAccumulator {
    Sum(f64),
    /// `None` once the exact total overflowed.
    PreciseSum(Option<Decimal>),
    /// First value seen, or `None` once two children disagreed.
    Equal(Option<FieldValue>),
}

impl FieldAccumulator {
    fn new(mode: AggregationMode, first: &FieldValue) -> Self {
        match mode {
            AggregationMode::Sum => FieldAccumulator::Sum(0.0),
            AggregationMode::PreciseSum => FieldAccumulator::PreciseSum(Some(Decimal::ZERO)),
            AggregationMode::EqualOrBlank => FieldAccumulator::Equal(Some(first.clone())),
        }
    }

    fn add(&mut self, field: &str, value: &FieldValue) {
        match self {
            FieldAccumulator::Sum(total) => {
                *total += value.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0);
            }
            FieldAccumulator::PreciseSum(state) => match (*state, value.to_decimal()) {
                (None, _) => {}
                (Some(total), Some(d)) => {
                    *state = total.checked_add(d);
                    if state.is_none() {
                        warn!("precise sum of '{}' overflowed; shown as blank", field);
                    }
                }
                (Some(_), None) => {
                    if let FieldValue::Number(n) = value {
                        warn!("'{}' value {} has no exact decimal form; counted as 0", field, n);
                    }
                }
            },
            FieldAccumulator::Equal(shared) => {
                if shared.as_ref().is_some_and(|v| v != value) {
                    *shared = None;
                }
            }
        }
    }

    fn finish(self) -> FieldValue {
        match self {
            FieldAccumulator::Sum(total) => FieldValue::Number(total),
            FieldAccumulator::PreciseSum(Some(total)) => FieldValue::Decimal(total),
            FieldAccumulator::PreciseSum(None) => FieldValue::blank(),
            FieldAccumulator::Equal(Some(value)) => value,
            FieldAccumulator::Equal(None) => FieldValue::blank(),
        }
    }
}

/// Folds the immediate children of a group.
fn fold_children(children: &[TreeRow], policy: &AggregationPolicy) -> Aggregates {
    let fields: Vec<(&str, AggregationMode)> = policy.entries().collect();
    let mut accumulators: Vec<Option<FieldAccumulator>> = vec![None; fields.len()];
    let mut leaf_count = 0;

    for child in children {
        leaf_count += child.leaf_count();

        for (slot, &(field, mode)) in accumulators.iter_mut().zip(&fields) {
            let value = match child.field_value(field) {
                Some(value) => value,
                None => continue,
            };
            let acc = slot.get_or_insert_with(|| FieldAccumulator::new(mode, value));
            // A group's precise total is either a decimal or the overflow blank.
            let overflowed = mode == AggregationMode::PreciseSum
                && child.is_group()
                && !matches!(value, FieldValue::Decimal(_));
            if overflowed {
                *acc = FieldAccumulator::PreciseSum(None);
            } else {
                acc.add(field, value);
            }
        }
    }

    let values: BTreeMap<String, FieldValue> = fields
        .iter()
        .zip(accumulators)
        .filter_map(|(&(field, _), acc)| acc.map(|acc| (field.to_string(), acc.finish())))
        .collect();

    Aggregates { values, leaf_count }
}

// ============================================================================
// TREE FOLD
// ============================================================================

/// Aggregates every group in `rows` bottom-up.
///
/// Leaves are returned unchanged. When `comparator` is given each sibling list
/// is sorted (stably) once its members have been aggregated, so a comparator
/// can read the aggregates.
pub fn aggregate_tree(
    rows: Vec<TreeRow>,
    policy: &AggregationPolicy,
    comparator: Option<SiblingComparator<'_>>,
) -> Vec<TreeRow> {
    let mut rows: Vec<TreeRow> = rows
        .into_iter()
        .map(|row| match row {
            TreeRow::Group(node) => TreeRow::Group(aggregate_node(node, policy, comparator)),
            leaf => leaf,
        })
        .collect();

    if let Some(compare) = comparator {
        rows.sort_by(|a, b| compare(a, b));
    }

    rows
}

fn aggregate_node(
    mut node: GroupNode,
    policy: &AggregationPolicy,
    comparator: Option<SiblingComparator<'_>>,
) -> GroupNode {
    let children = aggregate_tree(std::mem::take(&mut node.children), policy, comparator);
    node.aggregates = Some(fold_children(&children, policy));
    node.children = children;
    node
}
