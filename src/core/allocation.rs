//! Budget table data model: groups of line items with an immutable baseline.
use serde::{Deserialize, Serialize};

/// Percentage deviation of `current` from `original`.
///
/// Returns 0 when the baseline is zero or either operand is NaN, so a row
/// without a meaningful baseline never reports a variance.
pub fn variance(current: f64, original: f64) -> f64 {
    if original == 0.0 || current.is_nan() || original.is_nan() {
        return 0.0;
    }
    (current - original) / original * 100.0
}

/// A leaf row with its own baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub original_value: f64,
    pub variance: Option<f64>,
}

impl LineItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            original_value: value,
            variance: None,
        }
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
        self.variance = Some(variance(self.value, self.original_value));
    }
}

/// A top-level row aggregating its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub original_value: f64,
    pub children: Vec<LineItem>,
    pub variance: Option<f64>,
}

impl Group {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        value: f64,
        children: Vec<LineItem>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value,
            original_value: value,
            children,
            variance: None,
        }
    }

    /// Sum of the current values of all children.
    pub fn children_total(&self) -> f64 {
        self.children.iter().map(|c| c.value).sum()
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = value;
        self.variance = Some(variance(self.value, self.original_value));
    }
}

/// Where a row lives inside a [`BudgetTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPosition {
    Group(usize),
    Item { group: usize, child: usize },
}

/// Ordered sequence of groups; insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetTable {
    pub groups: Vec<Group>,
}

impl BudgetTable {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Finds a row by id, searching groups before their children.
    pub fn locate(&self, row_id: &str) -> Option<RowPosition> {
        for (gi, group) in self.groups.iter().enumerate() {
            if group.id == row_id {
                return Some(RowPosition::Group(gi));
            }
            if let Some(ci) = group.children.iter().position(|c| c.id == row_id) {
                return Some(RowPosition::Item {
                    group: gi,
                    child: ci,
                });
            }
        }
        None
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.groups
            .iter()
            .flat_map(|g| g.children.iter())
            .find(|c| c.id == item_id)
    }

    /// Current value of any row, group or line item.
    pub fn value_of(&self, row_id: &str) -> Option<f64> {
        match self.locate(row_id)? {
            RowPosition::Group(gi) => Some(self.groups[gi].value),
            RowPosition::Item { group, child } => Some(self.groups[group].children[child].value),
        }
    }

    pub fn grand_total(&self) -> f64 {
        grand_total(self)
    }

    /// Sum of every group's baseline value.
    pub fn original_grand_total(&self) -> f64 {
        self.groups.iter().map(|g| g.original_value).sum()
    }
}

/// Sum of all top-level group values.
pub fn grand_total(table: &BudgetTable) -> f64 {
    table.groups.iter().map(|g| g.value).sum()
}
