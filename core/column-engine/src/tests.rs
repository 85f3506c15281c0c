//! FILENAME: core/column-engine/src/tests.rs
//! Property tests over randomly shaped column trees.

use proptest::prelude::*;

use crate::{
    extract_leaves, flatten_columns, rebuild_columns, toggle_subtree, visible_columns,
    visible_data_indices, ColumnNode, FlatColumn, LeafColumn,
};

/// Column trees up to three levels deep; dataIndex values are unique.
fn arb_columns() -> impl Strategy<Value = Vec<ColumnNode>> {
    let leaf = (any::<bool>(), prop::option::of(40.0f64..400.0)).prop_map(|(visible, width)| {
        let mut leaf = LeafColumn::new("", "");
        leaf.visible = visible;
        leaf.width = width;
        ColumnNode::Leaf(leaf)
    });
    let tree = leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|children| ColumnNode::group("", children))
    });
    prop::collection::vec(tree, 0..5).prop_map(number_leaves)
}

/// Gives every leaf a distinct dataIndex and title.
fn number_leaves(mut columns: Vec<ColumnNode>) -> Vec<ColumnNode> {
    fn walk(columns: &mut [ColumnNode], next: &mut usize) {
        for column in columns {
            match column {
                ColumnNode::Leaf(leaf) => {
                    leaf.data_index = format!("f{}", next);
                    leaf.title = format!("Field {}", next);
                    *next += 1;
                }
                ColumnNode::Group(group) => {
                    group.header.title = format!("Group {}", next);
                    walk(&mut group.children, next);
                }
            }
        }
    }

    walk(&mut columns, &mut 0);
    columns
}

fn group_paths(flat: &[FlatColumn]) -> Vec<model::NodePath> {
    flat.iter()
        .filter(|entry| matches!(entry.node, crate::FlatNode::Group(_)))
        .map(|entry| entry.path.clone())
        .collect()
}

proptest! {
    #[test]
    fn prop_flatten_rebuild_round_trip(columns in arb_columns()) {
        let flat = flatten_columns(&columns);
        prop_assert_eq!(rebuild_columns(&flat).unwrap(), columns);
    }

    #[test]
    fn prop_flat_depth_matches_path(columns in arb_columns()) {
        for entry in flatten_columns(&columns) {
            prop_assert_eq!(entry.depth, entry.path.segments().len() - 1);
        }
    }

    #[test]
    fn prop_toggle_subtree_is_uniform(columns in arb_columns()) {
        for path in group_paths(&flatten_columns(&columns)) {
            let once = toggle_subtree(&columns, &path);
            let group = crate::find_column(&once, &path).unwrap();
            let leaves = extract_leaves(std::slice::from_ref(group));
            let first = leaves[0].visible;
            prop_assert!(leaves.iter().all(|leaf| leaf.visible == first));

            // A second toggle flips the whole subtree again.
            let twice = toggle_subtree(&once, &path);
            let group = crate::find_column(&twice, &path).unwrap();
            let leaves = extract_leaves(std::slice::from_ref(group));
            prop_assert!(leaves.iter().all(|leaf| leaf.visible == !first));
        }
    }

    #[test]
    fn prop_visible_columns_keep_visible_leaves(columns in arb_columns()) {
        let visible = visible_columns(&columns);
        prop_assert_eq!(visible_data_indices(&visible), visible_data_indices(&columns));
        prop_assert!(extract_leaves(&visible).iter().all(|leaf| leaf.visible));
    }
}
