//! FILENAME: core/table-engine/src/definition.rs
//! Table Definition - The serializable configuration.
//!
//! Everything the host passes to describe one grouped table: the row key,
//! the group-by fields, the aggregation policy, the column tree and the
//! expand-column settings. Field names follow the widget's camelCase props,
//! so a definition can be loaded straight from the host's JSON.

use column_engine::{Align, ColumnNode, LeafColumn};
use group_engine::{AggregationPolicy, ExpandedKeys, GroupSort, GroupSpec};
use model::NodePath;
use serde::{Deserialize, Serialize};

use crate::error::TableError;

// ============================================================================
// EXPANDABLE CONFIG
// ============================================================================

/// Settings for the synthetic expand column and the initial expand state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandableConfig {
    /// dataIndex of the expand column; group rows expose their label here.
    #[serde(default = "default_expand_data_index")]
    pub expand_data_index: String,

    /// Groups expanded when the table is first shown.
    #[serde(default)]
    pub default_expanded_row_keys: Vec<NodePath>,

    #[serde(default = "default_expand_column_width")]
    pub expand_column_width: f64,

    #[serde(default)]
    pub expand_column_title: String,

    /// Horizontal indent per nesting level, in pixels.
    #[serde(default = "default_indent_size")]
    pub indent_size: f64,
}

fn default_expand_data_index() -> String {
    group_engine::DEFAULT_LABEL_FIELD.to_string()
}

fn default_expand_column_width() -> f64 {
    150.0
}

fn default_indent_size() -> f64 {
    15.0
}

impl Default for ExpandableConfig {
    fn default() -> Self {
        ExpandableConfig {
            expand_data_index: default_expand_data_index(),
            default_expanded_row_keys: Vec::new(),
            expand_column_width: default_expand_column_width(),
            expand_column_title: String::new(),
            indent_size: default_indent_size(),
        }
    }
}

impl ExpandableConfig {
    /// The leading column that shows group labels in grouped mode.
    pub fn expand_column(&self) -> ColumnNode {
        LeafColumn::new(self.expand_column_title.clone(), self.expand_data_index.clone())
            .with_width(self.expand_column_width)
            .with_align(Align::Left)
            .into()
    }

    pub fn initial_expanded_keys(&self) -> ExpandedKeys {
        ExpandedKeys::from_paths(self.default_expanded_row_keys.iter().cloned())
    }

    /// Left padding for a row at `depth`.
    pub fn indent(&self, depth: usize) -> f64 {
        depth as f64 * self.indent_size
    }
}

// ============================================================================
// TABLE DEFINITION
// ============================================================================

/// The complete definition of a grouped table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    /// Field that uniquely identifies a record.
    pub row_key: String,

    /// Group-by fields, outermost first. Empty means a flat table.
    #[serde(default)]
    pub group_keys: Vec<String>,

    /// When absent, groups are built but not aggregated.
    #[serde(default, alias = "AggregateKeys")]
    pub aggregate_keys: Option<AggregationPolicy>,

    #[serde(default)]
    pub columns: Vec<ColumnNode>,

    /// dataIndex values to display. `None` or empty shows every column.
    #[serde(default)]
    pub display_columns: Option<Vec<String>>,

    /// Sibling order applied while aggregating.
    #[serde(default)]
    pub sort: Option<GroupSort>,

    #[serde(default)]
    pub expandable: ExpandableConfig,
}

impl TableDefinition {
    pub fn new(row_key: impl Into<String>) -> Self {
        TableDefinition {
            row_key: row_key.into(),
            group_keys: Vec::new(),
            aggregate_keys: None,
            columns: Vec::new(),
            display_columns: None,
            sort: None,
            expandable: ExpandableConfig::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_group_keys<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.group_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_aggregation(mut self, policy: AggregationPolicy) -> Self {
        self.aggregate_keys = Some(policy);
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnNode>) -> Self {
        self.columns = columns;
        self
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_keys.is_empty()
    }

    /// The grouping spec: group rows expose their label under the expand
    /// column's dataIndex.
    pub fn group_spec(&self) -> GroupSpec {
        GroupSpec::new(self.group_keys.clone(), self.row_key.clone())
            .with_label_field(self.expandable.expand_data_index.clone())
    }
}
