//! FILENAME: core/column-engine/src/definition.rs
//! Column Definition - The serializable column tree.
//!
//! A column is either a GROUP (a header spanning nested columns) or a LEAF
//! (a data column bound to one record field). The JSON shape is the table
//! widget's own: `{title, dataIndex?, width?, visible?, align?, children?, ...}`.
//! Unknown attributes (render hooks, styles) are kept verbatim in `extra`.
//!
//! Deserialization goes through `RawColumn` so that a node carrying both
//! children and a dataIndex, or neither, is rejected at the boundary.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ColumnError;

/// Horizontal alignment of a header or cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

// ============================================================================
// COLUMN NODES
// ============================================================================

/// Header attributes of a group column (everything but its children).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupHeader {
    pub title: String,
    pub align: Option<Align>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupColumn {
    pub header: GroupHeader,
    /// Never empty once validated.
    pub children: Vec<ColumnNode>,
}

impl GroupColumn {
    pub fn new(title: impl Into<String>, children: Vec<ColumnNode>) -> Self {
        GroupColumn {
            header: GroupHeader {
                title: title.into(),
                ..GroupHeader::default()
            },
            children,
        }
    }
}

/// A data column bound to one record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafColumn {
    pub title: String,
    pub data_index: String,
    pub width: Option<f64>,
    pub visible: bool,
    pub align: Option<Align>,
    pub extra: Map<String, Value>,
}

impl LeafColumn {
    pub fn new(title: impl Into<String>, data_index: impl Into<String>) -> Self {
        LeafColumn {
            title: title.into(),
            data_index: data_index.into(),
            width: None,
            visible: true,
            align: None,
            extra: Map::new(),
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A node of the column tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColumn", into = "RawColumn")]
pub enum ColumnNode {
    Group(GroupColumn),
    Leaf(LeafColumn),
}

impl ColumnNode {
    pub fn leaf(title: impl Into<String>, data_index: impl Into<String>) -> Self {
        ColumnNode::Leaf(LeafColumn::new(title, data_index))
    }

    pub fn group(title: impl Into<String>, children: Vec<ColumnNode>) -> Self {
        ColumnNode::Group(GroupColumn::new(title, children))
    }

    pub fn title(&self) -> &str {
        match self {
            ColumnNode::Group(group) => &group.header.title,
            ColumnNode::Leaf(leaf) => &leaf.title,
        }
    }

    pub fn data_index(&self) -> Option<&str> {
        match self {
            ColumnNode::Group(_) => None,
            ColumnNode::Leaf(leaf) => Some(&leaf.data_index),
        }
    }

    pub fn children(&self) -> &[ColumnNode] {
        match self {
            ColumnNode::Group(group) => &group.children,
            ColumnNode::Leaf(_) => &[],
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafColumn> {
        match self {
            ColumnNode::Leaf(leaf) => Some(leaf),
            ColumnNode::Group(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ColumnNode::Leaf(_))
    }

    /// Number of leaf columns at or below this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            ColumnNode::Leaf(_) => 1,
            ColumnNode::Group(group) => group.children.iter().map(ColumnNode::leaf_count).sum(),
        }
    }

    /// A leaf's own flag; for a group, whether any leaf below is visible.
    pub fn is_visible(&self) -> bool {
        match self {
            ColumnNode::Leaf(leaf) => leaf.visible,
            ColumnNode::Group(group) => group.children.iter().any(ColumnNode::is_visible),
        }
    }
}

impl From<LeafColumn> for ColumnNode {
    fn from(leaf: LeafColumn) -> Self {
        ColumnNode::Leaf(leaf)
    }
}

impl From<GroupColumn> for ColumnNode {
    fn from(group: GroupColumn) -> Self {
        ColumnNode::Group(group)
    }
}

// ============================================================================
// WIRE SHAPE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawColumn {
    #[serde(default)]
    title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_index: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    align: Option<Align>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<RawColumn>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<RawColumn> for ColumnNode {
    type Error = ColumnError;

    fn try_from(raw: RawColumn) -> Result<Self, Self::Error> {
        match (raw.children.is_empty(), raw.data_index) {
            (false, Some(_)) => Err(ColumnError::AmbiguousColumn { title: raw.title }),
            (true, None) => Err(ColumnError::MissingDataIndex { title: raw.title }),
            (true, Some(data_index)) => Ok(ColumnNode::Leaf(LeafColumn {
                title: raw.title,
                data_index,
                width: raw.width,
                visible: raw.visible.unwrap_or(true),
                align: raw.align,
                extra: raw.extra,
            })),
            (false, None) => {
                let children = raw
                    .children
                    .into_iter()
                    .map(ColumnNode::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ColumnNode::Group(GroupColumn {
                    header: GroupHeader {
                        title: raw.title,
                        align: raw.align,
                        extra: raw.extra,
                    },
                    children,
                }))
            }
        }
    }
}

impl From<ColumnNode> for RawColumn {
    fn from(node: ColumnNode) -> Self {
        match node {
            ColumnNode::Leaf(leaf) => RawColumn {
                title: leaf.title,
                data_index: Some(leaf.data_index),
                width: leaf.width,
                visible: Some(leaf.visible),
                align: leaf.align,
                children: Vec::new(),
                extra: leaf.extra,
            },
            ColumnNode::Group(group) => RawColumn {
                title: group.header.title,
                data_index: None,
                width: None,
                visible: None,
                align: group.header.align,
                children: group.children.into_iter().map(RawColumn::from).collect(),
                extra: group.header.extra,
            },
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Rejects empty groups and leaf dataIndex values used twice.
pub fn validate_columns(columns: &[ColumnNode]) -> Result<(), ColumnError> {
    fn walk<'a>(columns: &'a [ColumnNode], seen: &mut FxHashSet<&'a str>) -> Result<(), ColumnError> {
        for column in columns {
            match column {
                ColumnNode::Leaf(leaf) => {
                    if !seen.insert(leaf.data_index.as_str()) {
                        return Err(ColumnError::DuplicateDataIndex(leaf.data_index.clone()));
                    }
                }
                ColumnNode::Group(group) => {
                    if group.children.is_empty() {
                        return Err(ColumnError::EmptyGroup {
                            title: group.header.title.clone(),
                        });
                    }
                    walk(&group.children, seen)?;
                }
            }
        }
        Ok(())
    }

    walk(columns, &mut FxHashSet::default())
}
