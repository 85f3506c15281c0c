//! FILENAME: core/column-engine/src/flatten.rs
//! Flatten / Rebuild - The column tree as an ordered list.
//!
//! Column managers edit columns as a flat list where each entry knows its
//! depth and its positional path. `flatten_columns` produces that list in
//! pre-order; `rebuild_columns` turns an (edited) list back into a tree by
//! attaching each entry to the entry whose path is its own minus the last
//! segment. `rebuild_columns(&flatten_columns(t)) == t` for any valid tree.

use log::debug;
use model::NodePath;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::definition::{ColumnNode, GroupColumn, GroupHeader, LeafColumn};
use crate::error::ColumnError;

/// A flattened column: a group's header without its children, or a leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FlatNode {
    Group(GroupHeader),
    Leaf(LeafColumn),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatColumn {
    pub path: NodePath,
    pub depth: usize,
    pub node: FlatNode,
}

/// Pre-order list of every column with its depth and path.
pub fn flatten_columns(columns: &[ColumnNode]) -> Vec<FlatColumn> {
    fn walk(columns: &[ColumnNode], parent: Option<&NodePath>, out: &mut Vec<FlatColumn>) {
        for (i, column) in columns.iter().enumerate() {
            let path = match parent {
                Some(p) => p.child(i),
                None => NodePath::root(i),
            };
            match column {
                ColumnNode::Leaf(leaf) => out.push(FlatColumn {
                    depth: path.depth(),
                    path,
                    node: FlatNode::Leaf(leaf.clone()),
                }),
                ColumnNode::Group(group) => {
                    out.push(FlatColumn {
                        depth: path.depth(),
                        path: path.clone(),
                        node: FlatNode::Group(group.header.clone()),
                    });
                    walk(&group.children, Some(&path), out);
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(columns, None, &mut out);
    out
}

/// Rebuilds a column tree from a flat list.
///
/// Children attach to their parent in list order. Group entries that end up
/// without children are dropped.
pub fn rebuild_columns(flat: &[FlatColumn]) -> Result<Vec<ColumnNode>, ColumnError> {
    let mut slots: FxHashMap<&NodePath, usize> = FxHashMap::default();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); flat.len()];
    let mut roots = Vec::new();

    for (i, entry) in flat.iter().enumerate() {
        if slots.insert(&entry.path, i).is_some() {
            return Err(ColumnError::DuplicatePath(entry.path.clone()));
        }

        match entry.path.parent() {
            None => roots.push(i),
            Some(parent) => {
                let slot = *slots
                    .get(&parent)
                    .ok_or_else(|| ColumnError::OrphanPath(entry.path.clone()))?;
                if let FlatNode::Leaf(_) = flat[slot].node {
                    return Err(ColumnError::ParentIsLeaf(entry.path.clone()));
                }
                children[slot].push(i);
            }
        }
    }

    Ok(roots
        .into_iter()
        .filter_map(|i| assemble(flat, &children, i))
        .collect())
}

fn assemble(flat: &[FlatColumn], children: &[Vec<usize>], index: usize) -> Option<ColumnNode> {
    match &flat[index].node {
        FlatNode::Leaf(leaf) => Some(ColumnNode::Leaf(leaf.clone())),
        FlatNode::Group(header) => {
            let nested: Vec<ColumnNode> = children[index]
                .iter()
                .filter_map(|&child| assemble(flat, children, child))
                .collect();
            if nested.is_empty() {
                debug!("dropping empty column group at {}", flat[index].path);
                return None;
            }
            Some(ColumnNode::Group(GroupColumn {
                header: header.clone(),
                children: nested,
            }))
        }
    }
}

/// Every leaf column, depth-first, in display order.
pub fn extract_leaves(columns: &[ColumnNode]) -> Vec<&LeafColumn> {
    fn walk<'a>(columns: &'a [ColumnNode], out: &mut Vec<&'a LeafColumn>) {
        for column in columns {
            match column {
                ColumnNode::Leaf(leaf) => out.push(leaf),
                ColumnNode::Group(group) => walk(&group.children, out),
            }
        }
    }

    let mut out = Vec::new();
    walk(columns, &mut out);
    out
}

/// The column at `path`, following sibling indices from the root.
pub fn find_column<'a>(columns: &'a [ColumnNode], path: &NodePath) -> Option<&'a ColumnNode> {
    let (first, rest) = path.segments().split_first()?;
    let mut node = columns.get(*first)?;
    for &index in rest {
        node = node.children().get(index)?;
    }
    Some(node)
}

/// Like `find_column`, for a dash-joined path string such as `"1-0"`.
pub fn find_column_by_key<'a>(
    columns: &'a [ColumnNode],
    key: &str,
) -> Result<&'a ColumnNode, ColumnError> {
    let path: NodePath = key.parse()?;
    find_column(columns, &path).ok_or(ColumnError::PathNotFound(path))
}

// ============================================================================
// REORDER
// ============================================================================

/// Length of the contiguous block made of `flat[start]` and its descendants.
fn block_len(flat: &[FlatColumn], start: usize) -> usize {
    let root = &flat[start].path;
    1 + flat[start + 1..]
        .iter()
        .take_while(|entry| root.is_ancestor_of(&entry.path))
        .count()
}

/// Moves the entry at `from`, together with its descendants, so that it
/// starts at `to` in the resulting list. `to` is clamped to the list end.
///
/// Paths are left untouched; run the result through `rebuild_columns` to get
/// the reordered tree.
pub fn move_flat_entry(flat: &[FlatColumn], from: usize, to: usize) -> Vec<FlatColumn> {
    if from >= flat.len() {
        return flat.to_vec();
    }

    let len = block_len(flat, from);
    let mut rest = flat.to_vec();
    let block: Vec<FlatColumn> = rest.drain(from..from + len).collect();
    let to = to.min(rest.len());
    rest.splice(to..to, block);
    rest
}

/// Moves the column at `path` to position `new_index` among its siblings.
/// `new_index` past the last sibling moves it to the end.
pub fn move_column(
    columns: &[ColumnNode],
    path: &NodePath,
    new_index: usize,
) -> Result<Vec<ColumnNode>, ColumnError> {
    let flat = flatten_columns(columns);
    let from = flat
        .iter()
        .position(|entry| &entry.path == path)
        .ok_or_else(|| ColumnError::PathNotFound(path.clone()))?;

    let parent = path.parent();
    let siblings: Vec<usize> = flat
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.path.parent() == parent)
        .map(|(i, _)| i)
        .collect();

    let current = path.last();
    let target = new_index.min(siblings.len().saturating_sub(1));
    if target == current {
        return Ok(columns.to_vec());
    }

    let target_start = siblings[target];
    let to = if target > current {
        // Land after the target's block, measured once ours is removed.
        target_start + block_len(&flat, target_start) - block_len(&flat, from)
    } else {
        target_start
    };

    debug!("moving column {} to sibling position {}", path, target);
    rebuild_columns(&move_flat_entry(&flat, from, to))
}
