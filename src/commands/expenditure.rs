//! Expenditure command: purchased vs paid per category or stage.

use super::models::ExpenditureArgs;
use super::open_existing;
use crate::aggregator::{compute_expenditure, ExpenditureLine};
use crate::output::render_expenditure;
use crate::records::Dimension;
use anyhow::{Context, Result};
use log::debug;

/// Execute the expenditure command
///
/// **Public** - main entry point called from main.rs
pub fn execute_expenditure(args: &ExpenditureArgs) -> Result<Vec<ExpenditureLine>> {
    let store = open_existing(&args.db_path)?;

    let values = match args.dimension {
        Dimension::Category => store.categories()?,
        Dimension::Stage => store.stages()?,
    };
    let purchases = store.purchases(args.project_id)?;

    debug!(
        "Expenditure by {}: {} purchases, {} declared values",
        args.dimension,
        purchases.len(),
        values.len()
    );

    let lines = compute_expenditure(&purchases, args.dimension, &values)
        .context("Failed to summarize expenditure")?;

    if args.print_table {
        println!("{}", render_expenditure(&lines, args.dimension));
    }

    Ok(lines)
}
