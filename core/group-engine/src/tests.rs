//! FILENAME: core/group-engine/src/tests.rs
//! Property tests for the build and aggregate passes.

use std::collections::BTreeSet;

use model::{Decimal, FieldValue, Record};
use proptest::prelude::*;

use crate::{
    aggregate_tree, build_tree, collect_leaves, AggregationMode, AggregationPolicy, GroupSpec,
    TreeRow,
};

const KEY_FIELDS: [&str; 3] = ["desk", "book", "ccy"];

fn arb_key_value() -> impl Strategy<Value = Option<FieldValue>> {
    prop_oneof![
        Just(None),
        Just(Some(FieldValue::Null)),
        prop_oneof![Just("A"), Just("B"), Just("C")].prop_map(|s| Some(FieldValue::text(s))),
        (0i64..3).prop_map(|n| Some(FieldValue::from(n))),
    ]
}

fn arb_amount() -> impl Strategy<Value = f64> {
    // Two decimal places, like the currency amounts the table shows.
    (-100_000i64..100_000).prop_map(|cents| cents as f64 / 100.0)
}

fn arb_rows() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(
        (
            prop::collection::vec(arb_key_value(), KEY_FIELDS.len()),
            arb_amount(),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (keys, amount))| {
                let mut record = Record::new().with("id", i.to_string()).with("pv", amount);
                for (field, value) in KEY_FIELDS.iter().zip(keys) {
                    if let Some(value) = value {
                        record.insert(*field, value);
                    }
                }
                record
            })
            .collect()
    })
}

fn arb_group_keys() -> impl Strategy<Value = Vec<String>> {
    (0..=KEY_FIELDS.len())
        .prop_map(|n| KEY_FIELDS[..n].iter().map(|f| f.to_string()).collect())
}

fn ids(records: &[&Record]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|r| match r.get("id") {
            Some(FieldValue::Text(id)) => Some(id.clone()),
            _ => None,
        })
        .collect()
}

fn max_depth(rows: &[TreeRow]) -> usize {
    rows.iter()
        .map(|row| match row {
            TreeRow::Group(node) => 1 + max_depth(&node.children),
            TreeRow::Leaf(_) => 0,
        })
        .max()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn prop_every_record_lands_in_exactly_one_leaf(
        rows in arb_rows(),
        keys in arb_group_keys(),
    ) {
        let spec = GroupSpec::new(keys.clone(), "id");
        let tree = build_tree(&rows, &spec).unwrap();
        let leaves = collect_leaves(&tree);

        prop_assert_eq!(leaves.len(), rows.len());
        let all: Vec<&Record> = rows.iter().collect();
        prop_assert_eq!(ids(&leaves), ids(&all));
        if !rows.is_empty() {
            prop_assert_eq!(max_depth(&tree), keys.len());
        }
    }

    #[test]
    fn prop_aggregate_is_idempotent(rows in arb_rows(), keys in arb_group_keys()) {
        let spec = GroupSpec::new(keys, "id");
        let policy = AggregationPolicy::new()
            .with("pv", AggregationMode::PreciseSum)
            .with("ccy", AggregationMode::EqualOrBlank);

        let once = aggregate_tree(build_tree(&rows, &spec).unwrap(), &policy, None);
        let twice = aggregate_tree(once.clone(), &policy, None);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_precise_sum_matches_decimal_sum(rows in arb_rows()) {
        let spec = GroupSpec::new(vec!["desk".into()], "id");
        let policy = AggregationPolicy::new().with("pv", AggregationMode::PreciseSum);
        let tree = aggregate_tree(build_tree(&rows, &spec).unwrap(), &policy, None);

        for row in &tree {
            let node = row.as_group().unwrap();
            let expected: Decimal = node
                .children
                .iter()
                .filter_map(|child| child.field_value("pv").and_then(FieldValue::to_decimal))
                .sum();
            prop_assert_eq!(node.aggregate("pv"), Some(&FieldValue::Decimal(expected)));
            prop_assert_eq!(node.item_count(), node.child_count());
        }
    }
}
