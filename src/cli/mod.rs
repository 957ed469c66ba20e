//! Terminal presentation of the budget table

pub mod apply;
pub mod session;
pub mod setup;
pub mod table;
pub mod ui;
