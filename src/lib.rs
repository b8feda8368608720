//! Expense Pivot
//!
//! Construction-project purchase tracking with a category x stage
//! pivot report (row/column totals and percentages).
//!
//! This crate provides the core implementation for the
//! `expense-pivot` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! expense-pivot init
//! expense-pivot project add --name "Villa"
//! expense-pivot purchase add --project 1 --item Cement --vendor Ramco \
//!     --stage Basement --category Material --amount 4500
//! expense-pivot report --project 1
//! ```
//!
//! The aggregation itself is a pure function and can be used directly:
//! see [`aggregator::compute_pivot`].

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod records;
pub mod storage;
pub mod utils;
