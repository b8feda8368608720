use crate::records::Dimension;
use crate::utils::config::{DEFAULT_DB_PATH, NO_PAYMENT_MODE};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Database file to read from
    pub db_path: PathBuf,

    /// Limit the report to one project (None = every project)
    pub project_id: Option<i64>,

    /// Read dimensions and records from a JSON snapshot instead of the database
    pub snapshot: Option<PathBuf>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print the text table to stdout
    pub print_table: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            project_id: None,
            snapshot: None,
            output_json: None,
            print_table: true,
        }
    }
}

/// Arguments for the expenditure command
#[derive(Debug, Clone)]
pub struct ExpenditureArgs {
    pub db_path: PathBuf,

    /// Group by category or by stage
    pub dimension: Dimension,

    pub project_id: Option<i64>,

    pub print_table: bool,
}

impl Default for ExpenditureArgs {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            dimension: Dimension::Category,
            project_id: None,
            print_table: true,
        }
    }
}

/// Arguments for adding a purchase
#[derive(Debug, Clone)]
pub struct AddPurchaseArgs {
    pub db_path: PathBuf,
    pub project_id: i64,
    pub item_name: String,
    pub item_qty: Option<f64>,
    pub unit: Option<String>,
    pub vendor: String,
    pub stage: String,
    pub category: String,

    /// Purchase date (None = today)
    pub date: Option<NaiveDate>,

    pub purchase_amount: Decimal,
    pub mode_of_payment: String,
    pub paid_amount: Decimal,
    pub paid_by: Option<String>,
    pub notes: Option<String>,
}

impl Default for AddPurchaseArgs {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            project_id: 0,
            item_name: String::new(),
            item_qty: None,
            unit: None,
            vendor: String::new(),
            stage: String::new(),
            category: String::new(),
            date: None,
            purchase_amount: Decimal::ZERO,
            mode_of_payment: NO_PAYMENT_MODE.to_string(),
            paid_amount: Decimal::ZERO,
            paid_by: None,
            notes: None,
        }
    }
}
