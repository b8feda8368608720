//! Purchased vs paid amounts per category or per stage.
//!
//! A declared value with no purchases at all is reported as
//! "not yet started" rather than as a zero line.

use crate::records::{Dimension, Purchase};
use crate::utils::error::PivotError;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Spending state of one category or stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpenditureStatus {
    NotYetStarted,
    Spent {
        purchase: Decimal,
        paid: Decimal,
        /// Amount still owed (`purchase - paid`)
        difference: Decimal,
    },
}

/// One line of the expenditure summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenditureLine {
    pub label: String,
    #[serde(flatten)]
    pub status: ExpenditureStatus,
}

/// Summarize purchases per declared category or stage
///
/// **Public** - backs the `expenditure` command
///
/// # Arguments
/// * `purchases` - Stored purchase rows
/// * `dimension` - Which field of the purchase to group by
/// * `values` - Declared values for that dimension, in display order
///
/// # Returns
/// One line per declared value; purchases with undeclared values are ignored
///
/// # Errors
/// * `PivotError::Overflow` - a sum leaves the `Decimal` range
pub fn compute_expenditure(
    purchases: &[Purchase],
    dimension: Dimension,
    values: &[String],
) -> Result<Vec<ExpenditureLine>, PivotError> {
    debug!(
        "Summarizing {} purchases by {} over {} values",
        purchases.len(),
        dimension,
        values.len()
    );

    // label -> (purchase, paid)
    let mut sums: HashMap<&str, (Decimal, Decimal)> = HashMap::new();
    for purchase in purchases {
        let label = dimension.value_of(purchase);
        let entry = sums.entry(label).or_insert((Decimal::ZERO, Decimal::ZERO));
        let overflow = || PivotError::Overflow(format!("expenditure for {}", label));

        entry.0 = entry.0.checked_add(purchase.purchase_amount).ok_or_else(overflow)?;
        entry.1 = entry.1.checked_add(purchase.paid_amount).ok_or_else(overflow)?;
    }

    let mut lines: Vec<ExpenditureLine> = Vec::with_capacity(values.len());
    for value in values {
        if lines.iter().any(|l| &l.label == value) {
            continue;
        }

        let status = match sums.get(value.as_str()) {
            Some(&(purchase, paid)) => ExpenditureStatus::Spent {
                purchase,
                paid,
                difference: purchase.checked_sub(paid).ok_or_else(|| {
                    PivotError::Overflow(format!("expenditure difference for {}", value))
                })?,
            },
            None => ExpenditureStatus::NotYetStarted,
        };

        lines.push(ExpenditureLine {
            label: value.clone(),
            status,
        });
    }

    Ok(lines)
}
