//! Local persistence for projects and purchases.
//!
//! The store is the usual upstream source for reports: it supplies the
//! declared categories and stages plus the purchase records of a project.

pub mod sqlite;
pub mod validate;

pub use sqlite::ExpenseStore;
pub use validate::validate_purchase;
