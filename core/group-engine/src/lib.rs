//! FILENAME: core/group-engine/src/lib.rs
//! Grouping subsystem for hierarchical tables.
//!
//! Turns flat records into a multi-level tree keyed by an ordered list of
//! group fields, then folds per-field aggregates bottom-up. Depends on
//! `model` only for shared types (Record, FieldValue, NodePath).
//!
//! Layers:
//! - `definition`: Serializable configuration (group keys, aggregation policy, sort)
//! - `tree`: Tree structures and the build pass (HOW rows are bucketed)
//! - `aggregate`: Bottom-up fold and sibling ordering (HOW groups are summarized)
//! - `view`: Display rows under an expand state (WHAT the viewport renders)

pub mod aggregate;
pub mod definition;
pub mod error;
pub mod tree;
pub mod view;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate_tree, SiblingComparator};
pub use definition::*;
pub use error::GroupError;
pub use tree::{build_tree, collect_leaves, find_group, Aggregates, GroupNode, GroupTree, TreeRow};
pub use view::{flatten_display_rows, DisplayRow, ExpandedKeys, RowId};
