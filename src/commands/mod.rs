//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod expenditure;
pub mod models;
pub mod purchase;
pub mod report;
pub mod setup;
pub mod utils;

use crate::storage::ExpenseStore;
use anyhow::{Context, Result};
use std::path::Path;

// Re-export main command functions
pub use expenditure::execute_expenditure;
pub use models::{AddPurchaseArgs, ExpenditureArgs, ReportArgs};
pub use purchase::{
    execute_add_purchase, execute_delete_purchase, execute_list_purchases, execute_list_values,
};
pub use report::{execute_report, load_inputs, validate_args, ReportInputs};
pub use setup::{
    execute_add_project, execute_declare, execute_delete_project, execute_edit_project,
    execute_init, execute_list_projects, DeclareTarget,
};
pub use utils::{display_version, validate_report_file};

/// Open a database that `init` has already created
fn open_existing(db_path: &Path) -> Result<ExpenseStore> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {} (run `init` first)",
            db_path.display()
        );
    }

    ExpenseStore::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))
}
