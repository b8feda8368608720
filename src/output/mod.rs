//! Output writers for report data.
//!
//! This module handles presenting computed reports:
//! - JSON report files (pretty printed, versioned)
//! - Plain-text tables with currency and percentage formatting

pub mod json;
pub mod schema;
pub mod table;

// Re-export main functions
pub use json::{read_report, report_to_string, validate_path, write_report};
pub use schema::PivotReport;
pub use table::{format_currency, format_percentage, render_expenditure, render_pivot, render_purchases};
