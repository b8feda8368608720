use crate::output::{format_currency, read_report, PivotReport};
use crate::utils::config::REPORT_SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::warn;
use rust_decimal::Decimal;
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<PivotReport> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != REPORT_SCHEMA_VERSION {
        warn!(
            "Report schema v{} differs from current v{}",
            report.version, REPORT_SCHEMA_VERSION
        );
    }

    let column_sum = report
        .table
        .category_rows()
        .try_fold(Decimal::ZERO, |acc, row| acc.checked_add(row.total))
        .context("Report is inconsistent: category totals overflow")?;
    if column_sum != report.table.grand_total {
        anyhow::bail!(
            "Report is inconsistent: category totals sum to {} but grand total is {}",
            column_sum,
            report.table.grand_total
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    if let Some(project) = &report.project {
        println!("  Project: {}", project);
    }
    println!("  Generated: {}", report.generated_at);
    println!("  Categories: {}", report.table.category_rows().count());
    println!("  Stages: {}", report.table.stages.len());
    println!("  Grand Total: {}", format_currency(report.table.grand_total));

    Ok(report)
}

/// Display version information
pub fn display_version() {
    println!("Expense Pivot v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("Construction purchase tracking with category x stage pivot reports.");
}
