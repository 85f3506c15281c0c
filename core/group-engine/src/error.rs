//! FILENAME: core/group-engine/src/error.rs

use thiserror::Error;

use crate::definition::AggregationMode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("row key field must not be empty")]
    EmptyRowKeyField,

    #[error("field '{field}' is listed for both {first} and {second} aggregation")]
    ConflictingAggregation {
        field: String,
        first: AggregationMode,
        second: AggregationMode,
    },
}
