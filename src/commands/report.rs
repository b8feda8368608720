//! Report command implementation.
//!
//! The report command:
//! 1. Loads declared categories, stages and purchase records
//! 2. Builds the category x stage pivot
//! 3. Prints and/or writes the report

use super::models::ReportArgs;
use crate::aggregator::compute_pivot;
use crate::output::{render_pivot, validate_path, write_report, PivotReport};
use crate::records::{read_snapshot, PurchaseRecord};
use crate::utils::error::PivotError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Inputs for one pivot computation, whatever their source
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub records: Vec<PurchaseRecord>,
    pub categories: Vec<String>,
    pub stages: Vec<String>,
    pub project: Option<String>,
}

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was printed/written
///
/// # Errors
/// * Database or snapshot read failures
/// * No categories or stages declared
/// * File write errors
pub fn execute_report(args: &ReportArgs) -> Result<PivotReport> {
    let start_time = Instant::now();

    info!("Step 1/3: Loading purchase data...");
    let inputs = load_inputs(args)?;

    debug!(
        "Loaded {} records, {} categories, {} stages",
        inputs.records.len(),
        inputs.categories.len(),
        inputs.stages.len()
    );

    info!("Step 2/3: Building pivot...");
    let table = compute_pivot(&inputs.records, &inputs.categories, &inputs.stages).map_err(|e| {
        let hint = match e {
            PivotError::NoDimensions(_) => {
                "Cannot build the report; run `init` or declare categories and stages first"
            }
            PivotError::Overflow(_) => "Cannot build the report; amounts exceed the supported range",
        };
        anyhow::Error::new(e).context(hint)
    })?;

    info!("Grand total: {}", table.grand_total);

    let report = PivotReport::new(table, inputs.project);

    info!("Step 3/3: Writing output...");
    if args.print_table {
        if let Some(project) = &report.project {
            println!("Project: {}", project);
        }
        println!("{}", render_pivot(&report.table));
    }

    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    info!("Report completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// Gather records and dimensions from the snapshot or the database
///
/// **Public** - reused by tests and other front-ends
pub fn load_inputs(args: &ReportArgs) -> Result<ReportInputs> {
    if let Some(snapshot_path) = &args.snapshot {
        let snapshot = read_snapshot(snapshot_path)
            .with_context(|| format!("Failed to read snapshot {}", snapshot_path.display()))?;

        return Ok(ReportInputs {
            records: snapshot.records,
            categories: snapshot.categories,
            stages: snapshot.stages,
            project: None,
        });
    }

    let store = super::open_existing(&args.db_path)?;

    let project = match args.project_id {
        Some(id) => Some(store.project(id)?.to_string()),
        None => None,
    };

    Ok(ReportInputs {
        records: store.pivot_records(args.project_id)?,
        categories: store.categories().context("Failed to load categories")?,
        stages: store.stages().context("Failed to load stages")?,
        project,
    })
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.snapshot.is_some() && args.project_id.is_some() {
        anyhow::bail!("--project cannot be combined with --snapshot");
    }

    if args.snapshot.is_none() && args.db_path.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    if let Some(path) = &args.output_json {
        validate_path(path)?;
    }

    if !args.print_table && args.output_json.is_none() {
        anyhow::bail!("Nothing to do: enable table output or pass --output");
    }

    Ok(())
}
