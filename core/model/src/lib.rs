//! FILENAME: core/model/src/lib.rs
//! PURPOSE: Shared data model for the grouped table engines.
//! CONTEXT: Re-exports the record, value and path types used by
//! `group-engine`, `column-engine` and `table-engine`.

pub mod path;
pub mod record;
pub mod value;

// Re-export commonly used types at the crate root
pub use path::{NodePath, PathParseError};
pub use record::{is_numeric_field, Record};
pub use value::{compare_values, display_label, FieldValue, ValueKey, BLANK_LABEL};
pub use rust_decimal::Decimal;
