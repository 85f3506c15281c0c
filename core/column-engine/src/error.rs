//! FILENAME: core/column-engine/src/error.rs

use model::{NodePath, PathParseError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("column '{title}' has both children and a dataIndex")]
    AmbiguousColumn { title: String },

    #[error("column '{title}' has neither children nor a dataIndex")]
    MissingDataIndex { title: String },

    #[error("group column '{title}' has no children")]
    EmptyGroup { title: String },

    #[error("dataIndex '{0}' is used by more than one column")]
    DuplicateDataIndex(String),

    #[error("column path {0} appears more than once")]
    DuplicatePath(NodePath),

    #[error("column path {0} has no parent entry before it")]
    OrphanPath(NodePath),

    #[error("column path {0} is nested under a leaf column")]
    ParentIsLeaf(NodePath),

    #[error("no column at path {0}")]
    PathNotFound(NodePath),

    #[error("invalid column path: {0}")]
    InvalidPath(#[from] PathParseError),
}
