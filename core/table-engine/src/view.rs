//! FILENAME: core/table-engine/src/view.rs
//! Table View - The projected table handed to the renderers.
//!
//! A view is an immutable snapshot: the (possibly grouped) rows and the
//! columns that survived display filtering and visibility pruning. The
//! viewport renderer asks it for display rows under an expand state and for
//! the cells of each row; the header renderer asks it for header rows.

use column_engine::{extract_leaves, header_rows, ColumnNode, HeaderCell, LeafColumn};
use group_engine::{flatten_display_rows, DisplayRow, ExpandedKeys, GroupSpec, TreeRow};
use model::FieldValue;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    /// Top-level rows: groups when grouped, records otherwise.
    pub rows: Vec<TreeRow>,

    /// Columns to render, expand column first when grouped.
    pub columns: Vec<ColumnNode>,

    pub grouped: bool,

    /// The grouping that produced `rows`.
    pub spec: GroupSpec,
}

impl TableView {
    /// Rows visible under `expanded`, in render order.
    pub fn display_rows<'a>(&'a self, expanded: &ExpandedKeys) -> Vec<DisplayRow<'a>> {
        flatten_display_rows(&self.rows, &self.spec, expanded)
    }

    /// Leaf columns in display order; one cell per row each.
    pub fn data_columns(&self) -> Vec<&LeafColumn> {
        extract_leaves(&self.columns)
    }

    pub fn header_rows(&self) -> Vec<Vec<HeaderCell>> {
        header_rows(&self.columns)
    }

    /// Cell values of `row`, aligned with `data_columns()`.
    pub fn row_cells(&self, row: &DisplayRow<'_>) -> Vec<Option<FieldValue>> {
        self.data_columns()
            .iter()
            .map(|column| row.value(&column.data_index))
            .collect()
    }

    /// Number of top-level rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of source records in the view.
    pub fn record_count(&self) -> usize {
        self.rows.iter().map(TreeRow::leaf_count).sum()
    }
}
