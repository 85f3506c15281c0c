//! FILENAME: core/column-engine/src/lib.rs
//! Column tree subsystem for hierarchical tables.
//!
//! Columns nest: a group column spans the columns below it, and only leaf
//! columns are bound to record fields. Every operation here is pure; it takes
//! a borrowed tree and returns a new one.
//!
//! Layers:
//! - `definition`: Serializable column nodes and validation (what a column IS)
//! - `flatten`: Flat list form, rebuild and reordering (HOW columns are edited)
//! - `visibility`: Toggling and display filtering (WHICH columns show)
//! - `header`: Header row layout (WHAT the header renderer draws)

pub mod definition;
pub mod error;
pub mod flatten;
pub mod header;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use definition::{validate_columns, Align, ColumnNode, GroupColumn, GroupHeader, LeafColumn};
pub use error::ColumnError;
pub use flatten::{
    extract_leaves, find_column, find_column_by_key, flatten_columns, move_column,
    move_flat_entry, rebuild_columns, FlatColumn, FlatNode,
};
pub use header::{header_depth, header_rows, HeaderCell};
pub use visibility::{
    all_leaves_visible, retain_data_indices, show_only, toggle_all, toggle_leaf, toggle_subtree,
    visible_columns, visible_data_indices,
};
