//! Purchase entry, listing and deletion.

use super::models::AddPurchaseArgs;
use super::open_existing;
use crate::output::render_purchases;
use crate::records::{NewPurchase, Purchase, PurchaseColumn};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::path::Path;

/// Earliest purchase date accepted
fn min_purchase_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Validate and store a purchase, returning its id
///
/// **Public** - main entry point called from main.rs
pub fn execute_add_purchase(args: AddPurchaseArgs) -> Result<i64> {
    let today = Local::now().date_naive();
    let purchase = to_new_purchase(args.clone(), today)?;

    let store = open_existing(&args.db_path)?;

    if !store.categories()?.contains(&purchase.category) {
        warn!(
            "Category '{}' is not declared; this purchase will not appear in pivot reports",
            purchase.category
        );
    }
    if !store.stages()?.contains(&purchase.stage) {
        warn!(
            "Stage '{}' is not declared; this purchase will not appear in pivot reports",
            purchase.stage
        );
    }

    let modes = store.payment_modes()?;
    if !modes.contains(&purchase.mode_of_payment) {
        anyhow::bail!(
            "Unknown mode of payment '{}' (expected one of: {})",
            purchase.mode_of_payment,
            modes.join(", ")
        );
    }

    let id = store
        .add_purchase(&purchase)
        .context("Failed to add purchase")?;

    info!("✓ Purchase {} recorded", id);
    Ok(id)
}

/// Turn CLI arguments into an insertable purchase, checking the date range
///
/// **Public** - separated from execute_add_purchase so it can be tested without a database
pub fn to_new_purchase(args: AddPurchaseArgs, today: NaiveDate) -> Result<NewPurchase> {
    let date = args.date.unwrap_or(today);

    if date > today {
        anyhow::bail!("Purchase date {} is in the future", date);
    }
    if date < min_purchase_date() {
        anyhow::bail!("Purchase date {} is before {}", date, min_purchase_date());
    }

    Ok(NewPurchase {
        project_id: args.project_id,
        item_name: args.item_name.trim().to_string(),
        item_qty: args.item_qty,
        unit: args.unit,
        vendor: args.vendor.trim().to_string(),
        stage: args.stage,
        category: args.category,
        date,
        purchase_amount: args.purchase_amount,
        mode_of_payment: args.mode_of_payment,
        paid_amount: args.paid_amount,
        paid_by: args.paid_by.filter(|s| !s.trim().is_empty()),
        notes: args.notes.filter(|s| !s.trim().is_empty()),
    })
}

/// Print stored purchases, optionally only those whose `column` matches a value
///
/// Matching ignores case and surrounding spaces.
pub fn execute_list_purchases(
    db_path: &Path,
    project_id: Option<i64>,
    filter: Option<(PurchaseColumn, &str)>,
) -> Result<Vec<Purchase>> {
    let store = open_existing(db_path)?;
    let purchases = match filter {
        Some((column, value)) => store.purchases_by_column(project_id, column, value)?,
        None => store.purchases(project_id)?,
    };

    if purchases.is_empty() {
        println!("No data found for the selected criteria.");
    } else {
        println!("{}", render_purchases(&purchases));
    }

    Ok(purchases)
}

/// Print the distinct values stored in one purchase column
pub fn execute_list_values(
    db_path: &Path,
    project_id: Option<i64>,
    column: PurchaseColumn,
) -> Result<Vec<String>> {
    let store = open_existing(db_path)?;
    let values = store.distinct_values(project_id, column)?;

    println!("{}:", column);
    for value in &values {
        println!("  {}", value);
    }

    Ok(values)
}

pub fn execute_delete_purchase(db_path: &Path, id: i64) -> Result<()> {
    let store = open_existing(db_path)?;
    store
        .delete_purchase(id)
        .with_context(|| format!("Failed to delete purchase {}", id))?;

    info!("✓ Purchase {} deleted", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn args() -> AddPurchaseArgs {
        AddPurchaseArgs {
            project_id: 1,
            item_name: "  Teak door ".to_string(),
            vendor: "Woodworks".to_string(),
            stage: "Finishes".to_string(),
            category: "Joinery".to_string(),
            purchase_amount: Decimal::from(18000),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_to_today() {
        let purchase = to_new_purchase(args(), today()).unwrap();
        assert_eq!(purchase.date, today());
        assert_eq!(purchase.item_name, "Teak door");
    }

    #[test]
    fn test_future_date_rejected() {
        let future = AddPurchaseArgs {
            date: NaiveDate::from_ymd_opt(2024, 6, 2),
            ..args()
        };
        assert!(to_new_purchase(future, today()).is_err());
    }

    #[test]
    fn test_ancient_date_rejected() {
        let old = AddPurchaseArgs {
            date: NaiveDate::from_ymd_opt(1999, 12, 31),
            ..args()
        };
        assert!(to_new_purchase(old, today()).is_err());
    }

    #[test]
    fn test_blank_optional_text_dropped() {
        let purchase = to_new_purchase(
            AddPurchaseArgs {
                paid_by: Some("  ".to_string()),
                notes: Some(String::new()),
                ..args()
            },
            today(),
        )
        .unwrap();
        assert!(purchase.paid_by.is_none());
        assert!(purchase.notes.is_none());
    }
}
