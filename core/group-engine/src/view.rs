//! FILENAME: core/group-engine/src/view.rs
//! Display Rows - What the viewport renders.
//!
//! A grouped tree is flattened in pre-order into a list of display rows.
//! Children of a group are emitted only while that group is expanded.

use model::{display_label, FieldValue, NodePath};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::definition::GroupSpec;
use crate::tree::TreeRow;

/// Stable identity of a display row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum RowId {
    Group(NodePath),
    /// Display string of the record's row-key field.
    Record(String),
}

// ============================================================================
// EXPAND STATE
// ============================================================================

/// The set of expanded group keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedKeys {
    keys: FxHashSet<NodePath>,
}

impl ExpandedKeys {
    pub fn new() -> Self {
        ExpandedKeys::default()
    }

    pub fn from_paths(paths: impl IntoIterator<Item = NodePath>) -> Self {
        ExpandedKeys {
            keys: paths.into_iter().collect(),
        }
    }

    /// Every group in `rows` expanded.
    pub fn expand_all(rows: &[TreeRow]) -> Self {
        fn walk(rows: &[TreeRow], keys: &mut FxHashSet<NodePath>) {
            for row in rows {
                if let TreeRow::Group(node) = row {
                    keys.insert(node.key.clone());
                    walk(&node.children, keys);
                }
            }
        }

        let mut keys = FxHashSet::default();
        walk(rows, &mut keys);
        ExpandedKeys { keys }
    }

    /// Flips `path`. Returns whether it is expanded afterwards.
    pub fn toggle(&mut self, path: &NodePath) -> bool {
        if self.keys.remove(path) {
            false
        } else {
            self.keys.insert(path.clone());
            true
        }
    }

    pub fn expand(&mut self, path: NodePath) {
        self.keys.insert(path);
    }

    pub fn collapse(&mut self, path: &NodePath) {
        self.keys.remove(path);
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.keys.contains(path)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ============================================================================
// DISPLAY ROWS
// ============================================================================

/// One visible row of a grouped table.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow<'a> {
    pub id: RowId,
    /// Indent level, 0 for top-level rows.
    pub depth: usize,
    pub row: &'a TreeRow,
    pub has_children: bool,
    pub is_expanded: bool,
    label_field: &'a str,
}

impl<'a> DisplayRow<'a> {
    /// Cell value for the column bound to `data_index`.
    ///
    /// A group answers its label under the label field, its group value under
    /// its own level key, and its aggregates elsewhere.
    pub fn value(&self, data_index: &str) -> Option<FieldValue> {
        match self.row {
            TreeRow::Leaf(record) => record.get(data_index).cloned(),
            TreeRow::Group(node) => {
                if data_index == self.label_field {
                    Some(FieldValue::Text(node.label()))
                } else if let Some(value) = node.aggregate(data_index) {
                    Some(value.clone())
                } else if data_index == node.level_key {
                    node.group_value.clone()
                } else {
                    None
                }
            }
        }
    }

    /// `AAPL(2)`-style label for group rows.
    pub fn group_label(&self) -> Option<String> {
        self.row.as_group().map(|node| node.label())
    }

    pub fn is_group(&self) -> bool {
        self.row.is_group()
    }
}

/// Flattens `rows` into the rows currently visible under `expanded`.
pub fn flatten_display_rows<'a>(
    rows: &'a [TreeRow],
    spec: &'a GroupSpec,
    expanded: &ExpandedKeys,
) -> Vec<DisplayRow<'a>> {
    let mut out = Vec::new();
    flatten_into(rows, spec, expanded, 0, &mut out);
    out
}

fn flatten_into<'a>(
    rows: &'a [TreeRow],
    spec: &'a GroupSpec,
    expanded: &ExpandedKeys,
    depth: usize,
    out: &mut Vec<DisplayRow<'a>>,
) {
    for row in rows {
        match row {
            TreeRow::Leaf(record) => out.push(DisplayRow {
                id: RowId::Record(display_label(record.get(&spec.row_key_field))),
                depth,
                row,
                has_children: false,
                is_expanded: false,
                label_field: &spec.label_field,
            }),
            TreeRow::Group(node) => {
                let is_expanded = expanded.contains(&node.key);
                out.push(DisplayRow {
                    id: RowId::Group(node.key.clone()),
                    depth,
                    row,
                    has_children: !node.children.is_empty(),
                    is_expanded,
                    label_field: &spec.label_field,
                });
                if is_expanded {
                    flatten_into(&node.children, spec, expanded, depth + 1, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{AggregationMode, AggregationPolicy};
    use crate::tree::GroupTree;
    use model::Record;

    fn create_test_tree() -> GroupTree {
        let rows = vec![
            Record::new().with("pos", "1").with("inst", "AAPL").with("pv", 10000.0),
            Record::new().with("pos", "2").with("inst", "MSFT").with("pv", 20000.0),
            Record::new().with("pos", "3").with("inst", "AAPL").with("pv", 15000.0),
        ];
        let spec = GroupSpec::new(vec!["inst".into()], "pos");
        let policy = AggregationPolicy::new().with("pv", AggregationMode::Sum);
        GroupTree::build(&rows, spec).unwrap().aggregate(&policy, None)
    }

    #[test]
    fn test_collapsed_tree_shows_top_level_only() {
        let tree = create_test_tree();
        let rows = tree.display_rows(&ExpandedKeys::new());
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.has_children && !r.is_expanded));
        assert_eq!(rows[0].group_label().as_deref(), Some("AAPL(2)"));
    }

    #[test]
    fn test_expanded_group_emits_children() {
        let tree = create_test_tree();
        let mut expanded = ExpandedKeys::new();
        assert!(expanded.toggle(&NodePath::root(0)));

        let rows = tree.display_rows(&expanded);
        let ids: Vec<RowId> = rows.iter().map(|r| r.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                RowId::Group(NodePath::root(0)),
                RowId::Record("1".into()),
                RowId::Record("3".into()),
                RowId::Group(NodePath::root(1)),
            ]
        );
        assert_eq!(rows[1].depth, 1);

        assert!(!expanded.toggle(&NodePath::root(0)));
        assert!(expanded.is_empty());
    }

    #[test]
    fn test_display_values() {
        let tree = create_test_tree();
        let rows = tree.display_rows(&ExpandedKeys::expand_all(tree.roots()));
        assert_eq!(rows.len(), 5);

        let aapl = &rows[0];
        assert_eq!(aapl.value("expand"), Some(FieldValue::text("AAPL(2)")));
        assert_eq!(aapl.value("pv"), Some(FieldValue::Number(25000.0)));
        assert_eq!(aapl.value("inst"), Some(FieldValue::text("AAPL")));
        assert_eq!(aapl.value("other"), None);

        let leaf = &rows[1];
        assert_eq!(leaf.value("pv"), Some(FieldValue::Number(10000.0)));
        assert_eq!(leaf.group_label(), None);
    }

    #[test]
    fn test_expand_and_collapse() {
        let mut expanded = ExpandedKeys::from_paths(vec![NodePath::root(0)]);
        expanded.expand(NodePath::root(1));
        assert_eq!(expanded.len(), 2);
        expanded.collapse(&NodePath::root(0));
        assert!(!expanded.contains(&NodePath::root(0)));
        assert!(expanded.contains(&NodePath::root(1)));
    }
}
