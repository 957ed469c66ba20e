use budgetree::core::{AllocationEngine, BudgetTable, ChildUpdates, Group, LineItem, variance};
use proptest::prelude::*;

fn group_with(values: &[f64], group_value: f64) -> BudgetTable {
    let children = values
        .iter()
        .enumerate()
        .map(|(i, v)| LineItem::new(format!("item-{i}"), format!("Item {i}"), *v))
        .collect();
    BudgetTable::new(vec![Group::new("group", "Group", group_value, children)])
}

proptest! {
    #[test]
    fn prop_variance_is_zero_without_baseline(current in -1e12f64..1e12) {
        prop_assert_eq!(variance(current, 0.0), 0.0);
    }

    #[test]
    fn prop_redistribution_preserves_sum(
        values in prop::collection::vec(0.0f64..1e6, 1..8),
        target in -1e6f64..1e6,
    ) {
        let total: f64 = values.iter().sum();
        let mut engine = AllocationEngine::new(group_with(&values, total), ChildUpdates::Detached);
        engine.redistribute_group("group", Some(target));

        let group = engine.table().group("group").unwrap();
        let tolerance = 1e-9 * target.abs().max(1.0);
        prop_assert!((group.children_total() - group.value).abs() <= tolerance);
        prop_assert_eq!(group.value, target);
    }

    #[test]
    fn prop_redistribution_preserves_shares(
        values in prop::collection::vec(1.0f64..1e6, 2..8),
        factor in 0.1f64..10.0,
    ) {
        let total: f64 = values.iter().sum();
        let mut engine = AllocationEngine::new(group_with(&values, total), ChildUpdates::Detached);
        engine.redistribute_group("group", Some(total * factor));

        let group = engine.table().group("group").unwrap();
        for (child, original) in group.children.iter().zip(&values) {
            let expected = original * factor;
            prop_assert!((child.value - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }

    #[test]
    fn prop_rollup_keeps_parent_equal_to_children(
        values in prop::collection::vec(0.0f64..1e6, 1..8),
        new_value in 0.0f64..1e6,
    ) {
        let total: f64 = values.iter().sum();
        let mut engine = AllocationEngine::new(group_with(&values, total), ChildUpdates::Rollup);
        engine.reallocate_by_absolute("item-0", new_value);

        let group = engine.table().group("group").unwrap();
        let tolerance = 1e-9 * group.value.abs().max(1.0);
        prop_assert!((group.children_total() - group.value).abs() <= tolerance);
    }

    #[test]
    fn prop_non_numeric_input_changes_nothing(raw in "[a-zA-Z ]{0,12}") {
        use budgetree::core::{Action, ActionKind};

        let mut engine = AllocationEngine::new(group_with(&[100.0, 200.0], 300.0), ChildUpdates::Rollup);
        let before = engine.table().clone();
        prop_assert!(engine.dispatch(&Action::new("item-1", ActionKind::Percentage, raw.clone())).is_none());
        prop_assert!(engine.dispatch(&Action::new("group", ActionKind::Absolute, raw)).is_none());
        prop_assert_eq!(engine.table(), &before);
    }
}
