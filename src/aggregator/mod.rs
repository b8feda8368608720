//! Aggregation of purchase records into reports.
//!
//! This module transforms purchase data into:
//! - The category x stage pivot table (with totals and percentages)
//! - Purchased vs paid summaries per category or stage

pub mod expenditure;
pub mod pivot;

// Re-export main types and functions
pub use expenditure::{compute_expenditure, ExpenditureLine, ExpenditureStatus};
pub use pivot::{compute_pivot, percentage_of, ColumnLabel, PivotRow, PivotTable, RowLabel};
