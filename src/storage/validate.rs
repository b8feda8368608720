//! Checks applied to a purchase before it is written.

use crate::records::NewPurchase;
use crate::utils::config::{KNOWN_UNITS, NO_PAYMENT_MODE};
use crate::utils::error::StorageError;
use rust_decimal::Decimal;

/// Validate a purchase and return the form that should be stored
///
/// **Public** - called by `ExpenseStore::add_purchase`, usable for early checks
///
/// # Rules
/// * item name, vendor, stage, category and mode of payment are required
/// * a purchase must either have a non-zero amount or a positive payment
/// * paid amount cannot be negative
/// * with the "No Payment" mode the paid amount and payer are cleared
///
/// Category and stage are not checked against the declared values.
pub fn validate_purchase(purchase: &NewPurchase) -> Result<NewPurchase, StorageError> {
    let required = [
        ("item name", &purchase.item_name),
        ("vendor", &purchase.vendor),
        ("stage", &purchase.stage),
        ("category", &purchase.category),
        ("mode of payment", &purchase.mode_of_payment),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(StorageError::InvalidPurchase(format!("{} is required", field)));
        }
    }

    if let Some(unit) = purchase.unit.as_deref() {
        if !KNOWN_UNITS.contains(&unit) {
            return Err(StorageError::InvalidPurchase(format!(
                "unknown unit '{}' (expected one of {})",
                unit,
                KNOWN_UNITS.join(", ")
            )));
        }
    }

    if let Some(qty) = purchase.item_qty {
        if !qty.is_finite() || qty < 0.0 {
            return Err(StorageError::InvalidPurchase(format!(
                "item quantity must be a non-negative number, got {}",
                qty
            )));
        }
    }

    let mut normalized = purchase.clone();
    if normalized.mode_of_payment == NO_PAYMENT_MODE {
        normalized.paid_amount = Decimal::ZERO;
        normalized.paid_by = None;
    }

    if normalized.paid_amount < Decimal::ZERO {
        return Err(StorageError::InvalidPurchase(format!(
            "paid amount cannot be negative, got {}",
            normalized.paid_amount
        )));
    }

    if normalized.purchase_amount.is_zero() && normalized.paid_amount <= Decimal::ZERO {
        return Err(StorageError::InvalidPurchase(
            "either a purchase amount or a paid amount is required".to_string(),
        ));
    }

    Ok(normalized)
}
