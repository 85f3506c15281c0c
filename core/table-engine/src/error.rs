//! FILENAME: core/table-engine/src/error.rs

use column_engine::ColumnError;
use group_engine::GroupError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("grouping error: {0}")]
    Group(#[from] GroupError),

    #[error("column error: {0}")]
    Column(#[from] ColumnError),

    #[error("invalid table definition: {0}")]
    Config(#[from] serde_json::Error),
}
