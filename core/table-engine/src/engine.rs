//! FILENAME: core/table-engine/src/engine.rs
//! Table Engine - Projects records and columns into a TableView.
//!
//! Algorithm:
//! 1. Validate the row key and the column tree
//! 2. Rows: pass through when there are no group keys; otherwise build the
//!    group tree and, if a policy is configured, aggregate (and sort) it
//! 3. Columns: display filter, then drop hidden leaves, then prepend the
//!    expand column in grouped mode
//!
//! Inputs are only borrowed; the view owns copies.

use column_engine::{
    extract_leaves, retain_data_indices, validate_columns, visible_columns, ColumnNode,
};
use group_engine::{GroupSpec, GroupTree, SiblingComparator, TreeRow};
use log::debug;
use model::Record;

use crate::definition::TableDefinition;
use crate::error::TableError;
use crate::view::TableView;

// ============================================================================
// TABLE PROJECTOR
// ============================================================================

pub struct TableProjector<'a> {
    definition: &'a TableDefinition,
    rows: &'a [Record],
    comparator: Option<SiblingComparator<'a>>,
}

impl<'a> TableProjector<'a> {
    pub fn new(definition: &'a TableDefinition, rows: &'a [Record]) -> Self {
        TableProjector {
            definition,
            rows,
            comparator: None,
        }
    }

    /// Overrides the definition's `sort` for this projection.
    pub fn with_comparator(mut self, comparator: SiblingComparator<'a>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn project(&self) -> Result<TableView, TableError> {
        let spec = self.definition.group_spec();
        spec.validate()?;
        validate_columns(&self.definition.columns)?;

        let grouped = !spec.is_flat();
        let rows = self.project_rows(&spec)?;
        let columns = self.project_columns(grouped);

        debug!(
            "projected {} records into {} rows and {} data columns (grouped: {})",
            self.rows.len(),
            rows.len(),
            extract_leaves(&columns).len(),
            grouped
        );

        Ok(TableView {
            rows,
            columns,
            grouped,
            spec,
        })
    }

    fn project_rows(&self, spec: &GroupSpec) -> Result<Vec<TreeRow>, TableError> {
        if spec.is_flat() {
            return Ok(self.rows.iter().cloned().map(TreeRow::Leaf).collect());
        }

        let tree = GroupTree::build(self.rows, spec.clone())?;
        let policy = match &self.definition.aggregate_keys {
            Some(policy) => policy,
            None => return Ok(tree.into_rows()),
        };

        let by_sort = self
            .definition
            .sort
            .as_ref()
            .map(|sort| move |a: &TreeRow, b: &TreeRow| sort.compare(a, b));
        let comparator = match self.comparator {
            Some(comparator) => Some(comparator),
            None => by_sort.as_ref().map(|f| f as SiblingComparator<'_>),
        };

        Ok(tree.aggregate(policy, comparator).into_rows())
    }

    fn project_columns(&self, grouped: bool) -> Vec<ColumnNode> {
        let columns = &self.definition.columns;
        let displayed = match &self.definition.display_columns {
            Some(display) => retain_data_indices(columns, display),
            None => columns.clone(),
        };
        let mut visible = visible_columns(&displayed);

        if grouped {
            let expand = &self.definition.expandable;
            let defined = extract_leaves(columns)
                .iter()
                .any(|leaf| leaf.data_index == expand.expand_data_index);
            if !defined {
                visible.insert(0, expand.expand_column());
            }
        }

        visible
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Projects `rows` through `definition` into a renderable view.
/// `comparator`, when given, takes precedence over `definition.sort`.
pub fn project_table(
    definition: &TableDefinition,
    rows: &[Record],
    comparator: Option<SiblingComparator<'_>>,
) -> Result<TableView, TableError> {
    let projector = TableProjector::new(definition, rows);
    match comparator {
        Some(comparator) => projector.with_comparator(comparator).project(),
        None => projector.project(),
    }
}
