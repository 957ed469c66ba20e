//! The allocation engine: reallocates rows and propagates changes through the
//! group/line item hierarchy.
//!
//! All operations are total. Calls that cannot apply (unknown row, non-finite
//! input, overflow while propagating) leave the table untouched and return
//! `None`; the reason is logged at debug level.
use crate::core::allocation::{BudgetTable, Group, LineItem, RowPosition};
use crate::core::input::parse_numeric;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a line item reallocation affects its parent group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildUpdates {
    /// The child is overridden and the parent keeps its value.
    #[default]
    Detached,
    /// The parent is recomputed as the sum of its children.
    Rollup,
}

/// Kind of reallocation requested for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    Percentage,
    Absolute,
}

/// A user action against a single row, carrying the raw input as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub row_id: String,
    pub kind: ActionKind,
    pub raw_input: String,
}

impl Action {
    pub fn new(row_id: impl Into<String>, kind: ActionKind, raw_input: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            kind,
            raw_input: raw_input.into(),
        }
    }
}

/// The effect of an applied change on the targeted row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowChange {
    pub row_id: String,
    pub previous: f64,
    pub current: f64,
    pub variance: f64,
}

/// Serializable view of the table handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot<'a> {
    pub groups: &'a [Group],
    pub grand_total: f64,
    pub original_grand_total: f64,
}

pub struct AllocationEngine {
    table: BudgetTable,
    seed: BudgetTable,
    child_updates: ChildUpdates,
}

impl AllocationEngine {
    pub fn new(table: BudgetTable, child_updates: ChildUpdates) -> Self {
        Self {
            seed: table.clone(),
            table,
            child_updates,
        }
    }

    pub fn table(&self) -> &BudgetTable {
        &self.table
    }

    pub fn child_updates(&self) -> ChildUpdates {
        self.child_updates
    }

    pub fn grand_total(&self) -> f64 {
        self.table.grand_total()
    }

    pub fn snapshot(&self) -> TableSnapshot<'_> {
        TableSnapshot {
            groups: &self.table.groups,
            grand_total: self.table.grand_total(),
            original_grand_total: self.table.original_grand_total(),
        }
    }

    /// Restores the table to the state it was seeded with.
    pub fn reset(&mut self) {
        debug!("Resetting table to seed");
        self.table = self.seed.clone();
    }

    /// Parses the action's raw input and applies the matching reallocation.
    pub fn dispatch(&mut self, action: &Action) -> Option<RowChange> {
        let Some(amount) = parse_numeric(&action.raw_input) else {
            debug!(row_id = %action.row_id, raw_input = %action.raw_input, "Ignoring non-numeric input");
            return None;
        };
        match action.kind {
            ActionKind::Percentage => self.reallocate_by_percentage(&action.row_id, amount),
            ActionKind::Absolute => self.reallocate_by_absolute(&action.row_id, amount),
        }
    }

    /// Grows or shrinks a row by `percent` of its current value.
    pub fn reallocate_by_percentage(&mut self, row_id: &str, percent: f64) -> Option<RowChange> {
        if !percent.is_finite() {
            debug!(row_id, percent, "Ignoring non-finite percentage");
            return None;
        }
        let current = self.table.value_of(row_id)?;
        self.reallocate(row_id, current + current * percent / 100.0)
    }

    /// Sets a row to `new_value`.
    pub fn reallocate_by_absolute(&mut self, row_id: &str, new_value: f64) -> Option<RowChange> {
        if !new_value.is_finite() {
            debug!(row_id, new_value, "Ignoring non-finite value");
            return None;
        }
        self.reallocate(row_id, new_value)
    }

    fn reallocate(&mut self, row_id: &str, new_value: f64) -> Option<RowChange> {
        if !new_value.is_finite() {
            debug!(row_id, new_value, "Reallocation overflowed, ignoring");
            return None;
        }
        let position = self.table.locate(row_id);
        let before = self.table.clone();
        let change = self.apply_row_update(row_id, new_value)?;
        let propagated = match position {
            Some(RowPosition::Group(_)) => self.redistribute_group(row_id, Some(new_value)).is_some(),
            Some(RowPosition::Item { group, .. }) if self.child_updates == ChildUpdates::Rollup => {
                self.roll_up(group)
            }
            _ => true,
        };
        if !propagated {
            debug!(row_id, new_value, "Propagation failed, restoring previous values");
            self.table = before;
            return None;
        }
        Some(change)
    }

    /// Sets a group to the sum of its children, leaving the children as is.
    fn roll_up(&mut self, group_index: usize) -> bool {
        let group = &mut self.table.groups[group_index];
        let total = group.children_total();
        if !total.is_finite() {
            debug!(group_id = %group.id, "Children total overflowed, ignoring roll-up");
            return false;
        }
        group.set_value(total);
        debug!(group_id = %group.id, current = total, "Group rolled up");
        true
    }

    /// Sets the current value of a group or line item without propagating.
    pub fn apply_row_update(&mut self, row_id: &str, new_value: f64) -> Option<RowChange> {
        let Some(position) = self.table.locate(row_id) else {
            debug!(row_id, "Ignoring update for unknown row");
            return None;
        };
        let (previous, variance) = match position {
            RowPosition::Group(gi) => {
                let group = &mut self.table.groups[gi];
                let previous = group.value;
                group.set_value(new_value);
                (previous, group.variance)
            }
            RowPosition::Item { group, child } => {
                let item = &mut self.table.groups[group].children[child];
                let previous = item.value;
                item.set_value(new_value);
                (previous, item.variance)
            }
        };
        debug!(row_id, previous, current = new_value, "Row updated");
        Some(RowChange {
            row_id: row_id.to_string(),
            previous,
            current: new_value,
            variance: variance.unwrap_or_default(),
        })
    }

    /// Spreads a group's value across its children, preserving their shares.
    ///
    /// With `new_group_value` the group takes that value first; otherwise the
    /// group becomes the sum of its children. When every child is zero the
    /// value is split equally.
    pub fn redistribute_group(
        &mut self,
        group_id: &str,
        new_group_value: Option<f64>,
    ) -> Option<RowChange> {
        if new_group_value.is_some_and(|v| !v.is_finite()) {
            debug!(group_id, ?new_group_value, "Ignoring non-finite group value");
            return None;
        }
        let Some(group) = self.table.groups.iter_mut().find(|g| g.id == group_id) else {
            debug!(group_id, "Ignoring redistribution for unknown group");
            return None;
        };

        let previous = group.value;
        let total = group.children_total();
        let target = match new_group_value {
            Some(v) => v,
            None if group.children.is_empty() => group.value,
            None => total,
        };
        if !total.is_finite() || !target.is_finite() {
            debug!(group_id, total, target, "Group total overflowed, ignoring redistribution");
            return None;
        }
        let Some(values) = redistributed_values(target, total, &group.children) else {
            debug!(group_id, target, "Child share overflowed, ignoring redistribution");
            return None;
        };

        group.set_value(target);
        for (child, value) in group.children.iter_mut().zip(values) {
            child.set_value(value);
        }

        debug!(group_id, previous, current = target, "Group redistributed");
        Some(RowChange {
            row_id: group.id.clone(),
            previous,
            current: target,
            variance: group.variance.unwrap_or_default(),
        })
    }
}

/// New child values for `target`, or `None` if any share is not finite.
fn redistributed_values(target: f64, total: f64, children: &[LineItem]) -> Option<Vec<f64>> {
    let values: Vec<f64> = if total == 0.0 {
        debug!(
            children = children.len(),
            "Children sum to zero, splitting equally"
        );
        let share = target / children.len().max(1) as f64;
        children.iter().map(|_| share).collect()
    } else {
        children
            .iter()
            .map(|child| target * (child.value / total))
            .collect()
    };
    values.iter().all(|v| v.is_finite()).then_some(values)
}
