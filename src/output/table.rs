//! Plain-text rendering of reports.
//!
//! Amounts are shown as currency, percentage cells with a trailing `%`.
//! Synthetic rows are set off from the data rows by a rule.

use crate::aggregator::{ExpenditureLine, ExpenditureStatus, PivotRow, PivotTable, RowLabel};
use crate::records::{Dimension, Purchase};
use crate::utils::config::{
    CURRENCY_SYMBOL, NOT_YET_STARTED_LABEL, PERCENTAGE_DECIMAL_PLACES, PERCENTAGE_LABEL,
    TOTAL_LABEL,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as currency with thousands separators, e.g. `₹1,234.50`
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };

    format!("{}{}{}.{}", CURRENCY_SYMBOL, sign, group_thousands(whole), frac)
}

/// Format a percentage value, e.g. `25.00%`
pub fn format_percentage(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(
        PERCENTAGE_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );
    format!("{:.2}%", rounded)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Render the pivot as an aligned text table
///
/// **Public** - used by the report command
pub fn render_pivot(table: &PivotTable) -> String {
    let mut headers = vec![Dimension::Category.to_string()];
    headers.extend(table.stages.iter().cloned());
    headers.push(TOTAL_LABEL.to_string());
    headers.push(PERCENTAGE_LABEL.to_string());

    let body: Vec<Vec<String>> = table.rows.iter().map(pivot_cells).collect();

    // Rule above the first synthetic row
    let rule_before = table.rows.iter().position(|r| r.label.is_synthetic());

    render_grid(&headers, &body, rule_before)
}

fn pivot_cells(row: &PivotRow) -> Vec<String> {
    let as_value: fn(Decimal) -> String = match row.label {
        RowLabel::Percentage => format_percentage,
        _ => format_currency,
    };

    let mut cells = vec![row.label.to_string()];
    cells.extend(row.values.iter().map(|&v| as_value(v)));
    cells.push(as_value(row.total));
    cells.push(row.percentage.map(format_percentage).unwrap_or_default());
    cells
}

/// Render the purchased vs paid summary
pub fn render_expenditure(lines: &[ExpenditureLine], dimension: Dimension) -> String {
    let headers = vec![
        dimension.to_string(),
        "Purchase Amount".to_string(),
        "Paid Amount".to_string(),
        "Difference".to_string(),
    ];

    let body: Vec<Vec<String>> = lines
        .iter()
        .map(|line| match &line.status {
            ExpenditureStatus::NotYetStarted => vec![
                line.label.clone(),
                NOT_YET_STARTED_LABEL.to_string(),
                NOT_YET_STARTED_LABEL.to_string(),
                NOT_YET_STARTED_LABEL.to_string(),
            ],
            ExpenditureStatus::Spent {
                purchase,
                paid,
                difference,
            } => vec![
                line.label.clone(),
                format_currency(*purchase),
                format_currency(*paid),
                format_currency(*difference),
            ],
        })
        .collect();

    render_grid(&headers, &body, None)
}

/// Render stored purchases as a listing
pub fn render_purchases(purchases: &[Purchase]) -> String {
    let headers: Vec<String> = [
        "Purchase ID",
        "Item Name",
        "Item Quantity",
        "Vendor",
        "Stage",
        "Category",
        "Date",
        "Purchase Amount",
        "Mode of Payment",
        "Paid Amount",
        "Paid By",
        "Notes",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    let body: Vec<Vec<String>> = purchases
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.item_name.clone(),
                p.quantity_label(),
                p.vendor.clone(),
                p.stage.clone(),
                p.category.clone(),
                p.date.format("%Y-%m-%d").to_string(),
                format_currency(p.purchase_amount),
                p.mode_of_payment.clone(),
                format_currency(p.paid_amount),
                p.paid_by.clone().unwrap_or_default(),
                p.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();

    render_grid(&headers, &body, None)
}

/// First column left-aligned, the rest right-aligned
fn render_grid(headers: &[String], body: &[Vec<String>], rule_before: Option<usize>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in body {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i == 0 {
                    format!("{:<w$}", cell, w = w)
                } else {
                    format!("{:>w$}", cell, w = w)
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

    let mut out = String::new();
    out.push_str(&format_line(headers));
    out.push('\n');
    out.push_str(&"=".repeat(total_width));
    out.push('\n');

    for (i, row) in body.iter().enumerate() {
        if rule_before == Some(i) {
            out.push_str(&"-".repeat(total_width));
            out.push('\n');
        }
        out.push_str(&format_line(row));
        out.push('\n');
    }

    out
}
