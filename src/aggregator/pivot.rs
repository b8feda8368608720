//! Category x stage cross-tabulation of purchase amounts.
//!
//! The table has one row per declared category followed by the synthetic
//! `Grand Total` and `Percentage` rows, and one column per declared stage
//! followed by the synthetic `Total` and `Percentage` columns.
//!
//! Sums are exact decimals. Percentages are the only rounded values and are
//! never fed back into another computation.

use crate::records::{Dimension, PurchaseRecord};
use crate::utils::config::{
    GRAND_TOTAL_LABEL, PERCENTAGE_DECIMAL_PLACES, PERCENTAGE_LABEL, TOTAL_LABEL,
};
use crate::utils::error::PivotError;
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Row marker: a declared category or one of the synthetic rows
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum RowLabel {
    Category(String),
    GrandTotal,
    Percentage,
}

impl RowLabel {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, RowLabel::Category(_))
    }
}

impl fmt::Display for RowLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLabel::Category(name) => write!(f, "{}", name),
            RowLabel::GrandTotal => write!(f, "{}", GRAND_TOTAL_LABEL),
            RowLabel::Percentage => write!(f, "{}", PERCENTAGE_LABEL),
        }
    }
}

/// Column marker: a declared stage or one of the synthetic columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ColumnLabel {
    Stage(String),
    Total,
    Percentage,
}

impl ColumnLabel {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, ColumnLabel::Stage(_))
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnLabel::Stage(name) => write!(f, "{}", name),
            ColumnLabel::Total => write!(f, "{}", TOTAL_LABEL),
            ColumnLabel::Percentage => write!(f, "{}", PERCENTAGE_LABEL),
        }
    }
}

/// One row of the pivot table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotRow {
    pub label: RowLabel,

    /// One value per declared stage, in stage order
    pub values: Vec<Decimal>,

    /// Value in the `Total` column
    pub total: Decimal,

    /// Value in the `Percentage` column (empty for the `Percentage` row)
    pub percentage: Option<Decimal>,
}

/// Result of [`compute_pivot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Declared stages, in supplied order
    pub stages: Vec<String>,

    /// Category rows, then `Grand Total`, then `Percentage`
    pub rows: Vec<PivotRow>,

    /// Sum of every aggregated amount
    pub grand_total: Decimal,
}

impl PivotTable {
    /// All row labels in display order
    pub fn row_labels(&self) -> Vec<RowLabel> {
        self.rows.iter().map(|r| r.label.clone()).collect()
    }

    /// All column labels in display order
    pub fn column_labels(&self) -> Vec<ColumnLabel> {
        self.stages
            .iter()
            .cloned()
            .map(ColumnLabel::Stage)
            .chain([ColumnLabel::Total, ColumnLabel::Percentage])
            .collect()
    }

    /// Look up a single cell; `None` for unknown labels and the empty corner
    pub fn cell(&self, row: &RowLabel, column: &ColumnLabel) -> Option<Decimal> {
        let row = self.rows.iter().find(|r| &r.label == row)?;
        match column {
            ColumnLabel::Stage(stage) => {
                let idx = self.stages.iter().position(|s| s == stage)?;
                row.values.get(idx).copied()
            }
            ColumnLabel::Total => Some(row.total),
            ColumnLabel::Percentage => row.percentage,
        }
    }

    /// Summed amount for a declared (category, stage) pair
    pub fn amount(&self, category: &str, stage: &str) -> Option<Decimal> {
        self.cell(
            &RowLabel::Category(category.to_string()),
            &ColumnLabel::Stage(stage.to_string()),
        )
    }

    /// Rows for declared categories only
    pub fn category_rows(&self) -> impl Iterator<Item = &PivotRow> {
        self.rows.iter().filter(|r| !r.label.is_synthetic())
    }

    pub fn grand_total_row(&self) -> Option<&PivotRow> {
        self.rows.iter().find(|r| r.label == RowLabel::GrandTotal)
    }

    pub fn percentage_row(&self) -> Option<&PivotRow> {
        self.rows.iter().find(|r| r.label == RowLabel::Percentage)
    }
}

/// Build the category x stage pivot
///
/// **Public** - main entry point for report aggregation
///
/// # Arguments
/// * `records` - Purchase records; those with an undeclared category or stage are dropped
/// * `categories` - Declared categories, in display order
/// * `stages` - Declared stages, in display order
///
/// # Errors
/// * `PivotError::NoDimensions` - `categories` or `stages` is empty
/// * `PivotError::Overflow` - a sum or percentage exceeds the `Decimal` range
///
/// # Algorithm
/// 1. Seed a zero cell for every declared (category, stage) pair
/// 2. Add each record into its cell
/// 3. Derive row totals, column totals and the grand total
/// 4. Derive percentages against the grand total
pub fn compute_pivot(
    records: &[PurchaseRecord],
    categories: &[String],
    stages: &[String],
) -> Result<PivotTable, PivotError> {
    if categories.is_empty() {
        return Err(PivotError::NoDimensions(Dimension::Category));
    }
    if stages.is_empty() {
        return Err(PivotError::NoDimensions(Dimension::Stage));
    }

    let categories = dedup_preserving_order(categories);
    let stages = dedup_preserving_order(stages);

    debug!(
        "Building pivot from {} records over {} categories x {} stages",
        records.len(),
        categories.len(),
        stages.len()
    );

    let category_index: HashMap<&str, usize> = index_of(&categories);
    let stage_index: HashMap<&str, usize> = index_of(&stages);

    // cells[category][stage]
    let mut cells = vec![vec![Decimal::ZERO; stages.len()]; categories.len()];
    let mut dropped = 0usize;

    for record in records {
        match (
            category_index.get(record.category.as_str()),
            stage_index.get(record.stage.as_str()),
        ) {
            (Some(&c), Some(&s)) => {
                cells[c][s] = cells[c][s].checked_add(record.amount).ok_or_else(|| {
                    PivotError::Overflow(format!("{} / {}", categories[c], stages[s]))
                })?;
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("Dropped {} records with undeclared category or stage", dropped);
    }

    let row_totals = categories
        .iter()
        .zip(&cells)
        .map(|(category, row)| checked_sum(row.iter().copied(), category))
        .collect::<Result<Vec<_>, _>>()?;
    let column_totals = stages
        .iter()
        .enumerate()
        .map(|(s, stage)| checked_sum(cells.iter().map(|row| row[s]), stage))
        .collect::<Result<Vec<_>, _>>()?;
    let grand_total = checked_sum(row_totals.iter().copied(), GRAND_TOTAL_LABEL)?;

    let mut rows = Vec::with_capacity(categories.len() + 2);
    for ((category, values), &total) in categories.iter().zip(cells).zip(&row_totals) {
        rows.push(PivotRow {
            label: RowLabel::Category(category.to_string()),
            values,
            total,
            percentage: Some(percentage_of(total, grand_total)?),
        });
    }

    let whole = percentage_of(grand_total, grand_total)?;

    rows.push(PivotRow {
        label: RowLabel::GrandTotal,
        values: column_totals.clone(),
        total: grand_total,
        percentage: Some(whole),
    });

    rows.push(PivotRow {
        label: RowLabel::Percentage,
        values: column_totals
            .iter()
            .map(|&sum| percentage_of(sum, grand_total))
            .collect::<Result<Vec<_>, _>>()?,
        total: whole,
        percentage: None,
    });

    Ok(PivotTable {
        stages: stages.into_iter().map(str::to_string).collect(),
        rows,
        grand_total,
    })
}

/// `100 * part / whole` rounded half-up to 2 places; zero unless `whole` is positive
///
/// Multiplies first when that fits, otherwise divides first. Fails only when
/// the percentage itself is out of range, which needs negative amounts
/// elsewhere to shrink `whole` below `part`.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Result<Decimal, PivotError> {
    if whole <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole))
        .or_else(|| {
            part.checked_div(whole)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        })
        .map(|pct| {
            pct.round_dp_with_strategy(
                PERCENTAGE_DECIMAL_PLACES,
                RoundingStrategy::MidpointAwayFromZero,
            )
        })
        .ok_or_else(|| PivotError::Overflow(format!("percentage of {} in {}", part, whole)))
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>, what: &str) -> Result<Decimal, PivotError> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| PivotError::Overflow(format!("total for {}", what)))
}

/// Keep the first occurrence of each value
fn dedup_preserving_order(values: &[String]) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .map(String::as_str)
        .filter(|v| seen.insert(*v))
        .collect()
}

fn index_of<'a>(values: &[&'a str]) -> HashMap<&'a str, usize> {
    values.iter().enumerate().map(|(i, v)| (*v, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn d(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_percentage_of_rounds_half_up() {
        assert_eq!(percentage_of(d("1"), d("3")).unwrap(), d("33.33"));
        assert_eq!(percentage_of(d("2"), d("3")).unwrap(), d("66.67"));
        assert_eq!(percentage_of(d("1"), d("8")).unwrap(), d("12.50"));
        // 0.125% -> 0.13
        assert_eq!(percentage_of(d("1"), d("800")).unwrap(), d("0.13"));
    }

    #[test]
    fn test_percentage_of_non_positive_whole() {
        assert_eq!(percentage_of(d("10"), Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(percentage_of(d("10"), d("-5")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_of_large_part() {
        let huge = d("1000000000000000000000000000");
        assert_eq!(percentage_of(huge, huge).unwrap(), Decimal::ONE_HUNDRED);
        assert_eq!(percentage_of(Decimal::MAX, Decimal::MAX).unwrap(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_percentage_of_out_of_range() {
        let result = percentage_of(Decimal::MAX, d("0.0001"));
        assert!(matches!(result, Err(PivotError::Overflow(_))));
    }

    #[test]
    fn test_dedup_preserving_order() {
        let values = names(&["B", "A", "B", "C", "A"]);
        assert_eq!(dedup_preserving_order(&values), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_empty_categories() {
        let result = compute_pivot(&[], &[], &names(&["X"]));
        assert_eq!(result, Err(PivotError::NoDimensions(Dimension::Category)));
    }

    #[test]
    fn test_empty_stages() {
        let result = compute_pivot(&[], &names(&["A"]), &[]);
        assert_eq!(result, Err(PivotError::NoDimensions(Dimension::Stage)));
    }

    #[test]
    fn test_cell_lookup() {
        let records = vec![PurchaseRecord::new(d("12.5"), "A", "X")];
        let table = compute_pivot(&records, &names(&["A"]), &names(&["X"])).unwrap();

        assert_eq!(table.amount("A", "X"), Some(d("12.5")));
        assert_eq!(table.amount("A", "Nope"), None);
        assert_eq!(table.cell(&RowLabel::Percentage, &ColumnLabel::Percentage), None);
        assert_eq!(
            table.cell(&RowLabel::GrandTotal, &ColumnLabel::Percentage),
            Some(Decimal::ONE_HUNDRED)
        );
    }

    #[test]
    fn test_labels_in_order() {
        let table = compute_pivot(&[], &names(&["B", "A"]), &names(&["Y", "X"])).unwrap();

        assert_eq!(
            table.row_labels(),
            vec![
                RowLabel::Category("B".to_string()),
                RowLabel::Category("A".to_string()),
                RowLabel::GrandTotal,
                RowLabel::Percentage,
            ]
        );
        assert_eq!(
            table.column_labels(),
            vec![
                ColumnLabel::Stage("Y".to_string()),
                ColumnLabel::Stage("X".to_string()),
                ColumnLabel::Total,
                ColumnLabel::Percentage,
            ]
        );
    }

    #[test]
    fn test_label_display() {
        assert_eq!(RowLabel::GrandTotal.to_string(), "Grand Total");
        assert_eq!(ColumnLabel::Total.to_string(), "Total");
        assert_eq!(RowLabel::Category("Joinery".to_string()).to_string(), "Joinery");
        assert!(ColumnLabel::Percentage.is_synthetic());
        assert!(!ColumnLabel::Stage("Roof".to_string()).is_synthetic());
    }
}
