//! FILENAME: core/column-engine/src/visibility.rs
//! Column visibility and display filtering.
//!
//! Only leaves carry a `visible` flag. A group counts as visible while any
//! leaf below it is visible, and toggling a group writes one value to every
//! leaf below it. Every function returns a new tree; inputs are never
//! modified.

use log::trace;
use model::NodePath;
use rustc_hash::FxHashSet;

use crate::definition::{ColumnNode, GroupColumn, LeafColumn};
use crate::flatten::find_column;

/// Copies the tree, setting each leaf's visibility to `decide(path, leaf)`.
fn map_visibility(
    columns: &[ColumnNode],
    parent: Option<&NodePath>,
    decide: &mut dyn FnMut(&NodePath, &LeafColumn) -> bool,
) -> Vec<ColumnNode> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let path = match parent {
                Some(p) => p.child(i),
                None => NodePath::root(i),
            };
            match column {
                ColumnNode::Leaf(leaf) => {
                    let visible = decide(&path, leaf);
                    ColumnNode::Leaf(LeafColumn {
                        visible,
                        ..leaf.clone()
                    })
                }
                ColumnNode::Group(group) => ColumnNode::Group(GroupColumn {
                    header: group.header.clone(),
                    children: map_visibility(&group.children, Some(&path), decide),
                }),
            }
        })
        .collect()
}

/// Copies the tree keeping only leaves for which `keep` holds. Groups left
/// without leaves are dropped.
fn prune(columns: &[ColumnNode], keep: &dyn Fn(&LeafColumn) -> bool) -> Vec<ColumnNode> {
    columns
        .iter()
        .filter_map(|column| match column {
            ColumnNode::Leaf(leaf) => keep(leaf).then(|| column.clone()),
            ColumnNode::Group(group) => {
                let children = prune(&group.children, keep);
                (!children.is_empty()).then(|| {
                    ColumnNode::Group(GroupColumn {
                        header: group.header.clone(),
                        children,
                    })
                })
            }
        })
        .collect()
}

// ============================================================================
// TOGGLES
// ============================================================================

/// Flips the leaf bound to `data_index`. Unknown indices leave the tree as is.
pub fn toggle_leaf(columns: &[ColumnNode], data_index: &str) -> Vec<ColumnNode> {
    let mut found = false;
    let toggled = map_visibility(columns, None, &mut |_, leaf| {
        if leaf.data_index == data_index {
            found = true;
            !leaf.visible
        } else {
            leaf.visible
        }
    });
    if !found {
        trace!("toggle_leaf: no column bound to '{}'", data_index);
    }
    toggled
}

/// Toggles the column at `path` and everything below it.
///
/// The new value is the negation of the node's current visibility (for a
/// group: whether any leaf below is visible) and is written to every leaf
/// below. Unknown paths leave the tree as is.
pub fn toggle_subtree(columns: &[ColumnNode], path: &NodePath) -> Vec<ColumnNode> {
    let visible = match find_column(columns, path) {
        Some(node) => !node.is_visible(),
        None => {
            trace!("toggle_subtree: no column at {}", path);
            return columns.to_vec();
        }
    };

    map_visibility(columns, None, &mut |leaf_path, leaf| {
        if leaf_path == path || path.is_ancestor_of(leaf_path) {
            visible
        } else {
            leaf.visible
        }
    })
}

/// Shows or hides every leaf.
pub fn toggle_all(columns: &[ColumnNode], visible: bool) -> Vec<ColumnNode> {
    map_visibility(columns, None, &mut |_, _| visible)
}

/// Makes exactly the listed leaves visible.
pub fn show_only<S: AsRef<str>>(columns: &[ColumnNode], data_indices: &[S]) -> Vec<ColumnNode> {
    let wanted: FxHashSet<&str> = data_indices.iter().map(|s| s.as_ref()).collect();
    map_visibility(columns, None, &mut |_, leaf| {
        wanted.contains(leaf.data_index.as_str())
    })
}

// ============================================================================
// QUERIES
// ============================================================================

/// dataIndex of every visible leaf, in display order.
pub fn visible_data_indices(columns: &[ColumnNode]) -> Vec<&str> {
    crate::flatten::extract_leaves(columns)
        .into_iter()
        .filter(|leaf| leaf.visible)
        .map(|leaf| leaf.data_index.as_str())
        .collect()
}

/// True when no leaf is hidden (the column manager's select-all state).
pub fn all_leaves_visible(columns: &[ColumnNode]) -> bool {
    crate::flatten::extract_leaves(columns)
        .iter()
        .all(|leaf| leaf.visible)
}

/// The tree without hidden leaves and without groups left empty.
pub fn visible_columns(columns: &[ColumnNode]) -> Vec<ColumnNode> {
    prune(columns, &|leaf| leaf.visible)
}

/// Display filter: keeps only leaves whose dataIndex is listed, and the
/// groups that still contain one. An empty list keeps everything.
pub fn retain_data_indices<S: AsRef<str>>(
    columns: &[ColumnNode],
    display: &[S],
) -> Vec<ColumnNode> {
    if display.is_empty() {
        return columns.to_vec();
    }
    let wanted: FxHashSet<&str> = display.iter().map(|s| s.as_ref()).collect();
    prune(columns, &|leaf| wanted.contains(leaf.data_index.as_str()))
}
