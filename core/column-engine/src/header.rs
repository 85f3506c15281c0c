//! FILENAME: core/column-engine/src/header.rs
//! Header layout for nested columns.
//!
//! One header row per nesting level. A group cell spans the leaves below it;
//! a leaf cell stretches down to the last header row.

use model::NodePath;
use serde::Serialize;

use crate::definition::{Align, ColumnNode};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub title: String,
    pub path: NodePath,
    /// Set for leaf columns only.
    pub data_index: Option<String>,
    pub align: Option<Align>,
    pub col_span: usize,
    pub row_span: usize,
}

/// Number of header rows needed for `columns`.
pub fn header_depth(columns: &[ColumnNode]) -> usize {
    columns
        .iter()
        .map(|column| match column {
            ColumnNode::Leaf(_) => 1,
            ColumnNode::Group(group) => match header_depth(&group.children) {
                0 => 0,
                depth => depth + 1,
            },
        })
        .max()
        .unwrap_or(0)
}

/// Header cells, one `Vec` per header row, left to right.
pub fn header_rows(columns: &[ColumnNode]) -> Vec<Vec<HeaderCell>> {
    let depth = header_depth(columns);
    let mut rows = vec![Vec::new(); depth];
    place(columns, None, 0, depth, &mut rows);
    rows
}

fn place(
    columns: &[ColumnNode],
    parent: Option<&NodePath>,
    level: usize,
    depth: usize,
    rows: &mut [Vec<HeaderCell>],
) {
    for (i, column) in columns.iter().enumerate() {
        let path = match parent {
            Some(p) => p.child(i),
            None => NodePath::root(i),
        };
        match column {
            ColumnNode::Leaf(leaf) => rows[level].push(HeaderCell {
                title: leaf.title.clone(),
                path,
                data_index: Some(leaf.data_index.clone()),
                align: leaf.align,
                col_span: 1,
                row_span: depth - level,
            }),
            ColumnNode::Group(group) => {
                let span = column.leaf_count();
                if span == 0 {
                    continue;
                }
                rows[level].push(HeaderCell {
                    title: group.header.title.clone(),
                    path: path.clone(),
                    data_index: None,
                    align: group.header.align,
                    col_span: span,
                    row_span: 1,
                });
                place(&group.children, Some(&path), level + 1, depth, rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_columns() -> Vec<ColumnNode> {
        vec![
            ColumnNode::leaf("Position", "pos"),
            ColumnNode::group(
                "Risk",
                vec![
                    ColumnNode::leaf("PV", "pv"),
                    ColumnNode::group(
                        "Greeks",
                        vec![ColumnNode::leaf("Delta", "delta"), ColumnNode::leaf("Gamma", "gamma")],
                    ),
                ],
            ),
        ]
    }

    fn spans(row: &[HeaderCell]) -> Vec<(&str, usize, usize)> {
        row.iter()
            .map(|c| (c.title.as_str(), c.col_span, c.row_span))
            .collect()
    }

    #[test]
    fn test_header_depth() {
        assert_eq!(header_depth(&[]), 0);
        assert_eq!(header_depth(&[ColumnNode::leaf("A", "a")]), 1);
        assert_eq!(header_depth(&create_test_columns()), 3);
    }

    #[test]
    fn test_header_rows() {
        let rows = header_rows(&create_test_columns());
        assert_eq!(rows.len(), 3);
        assert_eq!(spans(&rows[0]), vec![("Position", 1, 3), ("Risk", 3, 1)]);
        assert_eq!(spans(&rows[1]), vec![("PV", 1, 2), ("Greeks", 2, 1)]);
        assert_eq!(spans(&rows[2]), vec![("Delta", 1, 1), ("Gamma", 1, 1)]);
        assert_eq!(rows[2][1].path.to_string(), "1-1-1");
        assert_eq!(rows[2][1].data_index.as_deref(), Some("gamma"));
    }

    #[test]
    fn test_leaf_only_header_is_single_row() {
        let rows = header_rows(&[ColumnNode::leaf("A", "a"), ColumnNode::leaf("B", "b")]);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].iter().all(|c| c.row_span == 1));
    }
}
