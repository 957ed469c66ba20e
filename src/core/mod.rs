//! Core business logic: the budget table model and the allocation engine

pub mod allocation;
pub mod config;
pub mod engine;
pub mod input;
pub mod log;

// Re-export main types for cleaner imports
pub use allocation::{BudgetTable, Group, LineItem, grand_total, variance};
pub use engine::{Action, ActionKind, AllocationEngine, ChildUpdates, RowChange, TableSnapshot};
pub use input::parse_numeric;
