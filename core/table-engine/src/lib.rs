//! FILENAME: core/table-engine/src/lib.rs
//! Grouped table facade.
//!
//! Glues the grouping engine and the column engine together: one call turns
//! a table definition and a slice of records into an immutable `TableView`
//! for the viewport and header renderers.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the table IS)
//! - `engine`: Projection (HOW rows and columns are prepared)
//! - `view`: Renderable output (WHAT we display)
//! - `fields`: Group-manager field pickers

pub mod definition;
pub mod engine;
pub mod error;
pub mod fields;
pub mod view;

pub use definition::{ExpandableConfig, TableDefinition};
pub use engine::{project_table, TableProjector};
pub use error::TableError;
pub use fields::{
    available_equal_keys, available_fields, available_group_keys, available_sum_keys, FieldChoices,
};
pub use view::TableView;
