//! FILENAME: core/group-engine/src/tree.rs
//! Group Tree - Buckets flat records into a multi-level hierarchy.
//!
//! Algorithm:
//! 1. Walk every record through the ordered group keys
//! 2. At each level reuse the sibling group with the same value, or append a
//!    new one (first-seen order)
//! 3. After the last key, attach the record itself as a leaf
//! 4. Assign every group its positional key (sibling indices from the root)
//!
//! Aggregation is a separate pass (see `aggregate.rs`).

use std::collections::BTreeMap;

use log::{debug, trace};
use model::{display_label, FieldValue, NodePath, Record, ValueKey};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_tree, SiblingComparator};
use crate::definition::{AggregationPolicy, GroupSpec};
use crate::error::GroupError;
use crate::view::{flatten_display_rows, DisplayRow, ExpandedKeys};

// ============================================================================
// TREE STRUCTURES
// ============================================================================

/// Folded values of a group, computed from its children only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    /// Aggregated field -> value. Fields no child carries are absent.
    pub values: BTreeMap<String, FieldValue>,

    /// Number of records beneath this group.
    pub leaf_count: usize,
}

/// One bucket at one level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    /// Sibling indices from the root, in first-seen order.
    pub key: NodePath,

    /// Value of `level_key` shared by every record below. `None` when the
    /// records lack the field.
    pub group_value: Option<FieldValue>,

    /// The group-key field this level buckets by.
    pub level_key: String,

    pub children: Vec<TreeRow>,

    /// `None` until the tree has been aggregated.
    pub aggregates: Option<Aggregates>,
}

impl GroupNode {
    pub fn new(key: NodePath, group_value: Option<FieldValue>, level_key: impl Into<String>) -> Self {
        GroupNode {
            key,
            group_value,
            level_key: level_key.into(),
            children: Vec::new(),
            aggregates: None,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Records beneath this group.
    pub fn leaf_count(&self) -> usize {
        match &self.aggregates {
            Some(aggregates) => aggregates.leaf_count,
            None => self.children.iter().map(TreeRow::leaf_count).sum(),
        }
    }

    /// Count shown next to the group value: the leaf count once aggregated,
    /// otherwise the number of immediate children.
    pub fn item_count(&self) -> usize {
        match &self.aggregates {
            Some(aggregates) => aggregates.leaf_count,
            None => self.child_count(),
        }
    }

    /// Display label, e.g. `AAPL(2)`.
    pub fn label(&self) -> String {
        format!("{}({})", display_label(self.group_value.as_ref()), self.item_count())
    }

    /// Aggregated value of `field`, if any.
    pub fn aggregate(&self, field: &str) -> Option<&FieldValue> {
        self.aggregates.as_ref()?.values.get(field)
    }
}

/// A row of the hierarchy: either a group or an input record.
///
/// Adjacently tagged: records are arbitrary field maps and may carry a
/// `kind` field of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "camelCase")]
pub enum TreeRow {
    Group(GroupNode),
    Leaf(Record),
}

impl TreeRow {
    pub fn is_group(&self) -> bool {
        matches!(self, TreeRow::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            TreeRow::Group(node) => Some(node),
            TreeRow::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Record> {
        match self {
            TreeRow::Leaf(record) => Some(record),
            TreeRow::Group(_) => None,
        }
    }

    /// 1 for a record, the group's leaf count otherwise.
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeRow::Group(node) => node.leaf_count(),
            TreeRow::Leaf(_) => 1,
        }
    }

    /// Value an aggregation reads from this row: the record field for a leaf,
    /// the freshly folded aggregate for a group.
    pub fn field_value(&self, field: &str) -> Option<&FieldValue> {
        match self {
            TreeRow::Leaf(record) => record.get(field),
            TreeRow::Group(node) => node.aggregate(field),
        }
    }

    /// Value used when ordering siblings by `field`. A group answers with its
    /// own group value when `field` is its level key.
    pub fn sort_value(&self, field: &str) -> Option<&FieldValue> {
        match self {
            TreeRow::Group(node) if node.level_key == field => node.group_value.as_ref(),
            _ => self.field_value(field),
        }
    }
}

/// Collects every record beneath `rows`, depth-first.
pub fn collect_leaves(rows: &[TreeRow]) -> Vec<&Record> {
    fn walk<'a>(rows: &'a [TreeRow], out: &mut Vec<&'a Record>) {
        for row in rows {
            match row {
                TreeRow::Leaf(record) => out.push(record),
                TreeRow::Group(node) => walk(&node.children, out),
            }
        }
    }

    let mut out = Vec::new();
    walk(rows, &mut out);
    out
}

/// Finds the group whose key is `path`. Works on sorted trees too.
pub fn find_group<'a>(rows: &'a [TreeRow], path: &NodePath) -> Option<&'a GroupNode> {
    for row in rows {
        if let TreeRow::Group(node) = row {
            if &node.key == path {
                return Some(node);
            }
            if node.key.is_ancestor_of(path) {
                return find_group(&node.children, path);
            }
        }
    }
    None
}

// ============================================================================
// BUILD
// ============================================================================

/// Sibling list under construction, with a value index for O(1) lookup.
#[derive(Default)]
struct BuildLevel {
    nodes: Vec<BuildNode>,
    index: FxHashMap<ValueKey, usize>,
}

struct BuildNode {
    value: Option<FieldValue>,
    children: BuildLevel,
    records: Vec<Record>,
}

impl BuildLevel {
    /// Index of the sibling holding `value`, appending one if needed.
    fn slot_for(&mut self, value: Option<&FieldValue>) -> usize {
        let key = ValueKey::from(value);
        if let Some(&slot) = self.index.get(&key) {
            return slot;
        }
        let slot = self.nodes.len();
        self.nodes.push(BuildNode {
            value: value.cloned(),
            children: BuildLevel::default(),
            records: Vec::new(),
        });
        self.index.insert(key, slot);
        slot
    }

    fn finish(self, parent: Option<&NodePath>, keys: &[String], depth: usize) -> Vec<TreeRow> {
        let level_key = keys.get(depth).cloned().unwrap_or_default();

        self.nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| {
                let key = match parent {
                    Some(path) => path.child(i),
                    None => NodePath::root(i),
                };
                let mut group = GroupNode::new(key, node.value, level_key.clone());
                let mut children = node.children.finish(Some(&group.key), keys, depth + 1);
                children.extend(node.records.into_iter().map(TreeRow::Leaf));
                group.children = children;
                TreeRow::Group(group)
            })
            .collect()
    }
}

/// Buckets `rows` by `spec.group_keys`.
///
/// With no group keys every record is returned as a leaf, in input order.
pub fn build_tree(rows: &[Record], spec: &GroupSpec) -> Result<Vec<TreeRow>, GroupError> {
    spec.validate()?;

    let (last_key, outer_keys) = match spec.group_keys.split_last() {
        Some(split) => split,
        None => return Ok(rows.iter().cloned().map(TreeRow::Leaf).collect()),
    };

    let mut roots = BuildLevel::default();

    for (row_index, row) in rows.iter().enumerate() {
        if !row.contains(&spec.row_key_field) {
            trace!(
                "row {} has no '{}' field; grouping it anyway",
                row_index,
                spec.row_key_field
            );
        }

        let mut level = &mut roots;
        for field in outer_keys {
            let slot = level.slot_for(row.get(field));
            level = &mut level.nodes[slot].children;
        }
        let slot = level.slot_for(row.get(last_key));
        level.nodes[slot].records.push(row.clone());
    }

    let tree = roots.finish(None, &spec.group_keys, 0);
    debug!(
        "grouped {} rows by {:?} into {} top-level groups",
        rows.len(),
        spec.group_keys,
        tree.len()
    );
    Ok(tree)
}

// ============================================================================
// GROUP TREE
// ============================================================================

/// A built hierarchy together with the grouping that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTree {
    spec: GroupSpec,
    roots: Vec<TreeRow>,
    aggregated: bool,
}

impl GroupTree {
    pub fn build(rows: &[Record], spec: GroupSpec) -> Result<Self, GroupError> {
        let roots = build_tree(rows, &spec)?;
        Ok(GroupTree {
            spec,
            roots,
            aggregated: false,
        })
    }

    /// Folds aggregates bottom-up and optionally orders every sibling list.
    pub fn aggregate(
        self,
        policy: &AggregationPolicy,
        comparator: Option<SiblingComparator<'_>>,
    ) -> Self {
        debug!(
            "aggregating {} top-level rows ({} policy fields, sorted: {})",
            self.roots.len(),
            policy.len(),
            comparator.is_some()
        );
        GroupTree {
            roots: aggregate_tree(self.roots, policy, comparator),
            spec: self.spec,
            aggregated: true,
        }
    }

    pub fn spec(&self) -> &GroupSpec {
        &self.spec
    }

    pub fn roots(&self) -> &[TreeRow] {
        &self.roots
    }

    pub fn into_rows(self) -> Vec<TreeRow> {
        self.roots
    }

    pub fn is_aggregated(&self) -> bool {
        self.aggregated
    }

    pub fn leaf_count(&self) -> usize {
        self.roots.iter().map(TreeRow::leaf_count).sum()
    }

    pub fn find_group(&self, path: &NodePath) -> Option<&GroupNode> {
        find_group(&self.roots, path)
    }

    pub fn display_rows<'a>(&'a self, expanded: &ExpandedKeys) -> Vec<DisplayRow<'a>> {
        flatten_display_rows(&self.roots, &self.spec, expanded)
    }
}
