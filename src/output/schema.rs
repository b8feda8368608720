//! Output JSON schema for saved pivot reports.
//!
//! Schema is versioned to allow future evolution.

use crate::aggregator::PivotTable;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Project the report covers ("<id> - <name>"), or none for all projects
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project: Option<String>,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    /// The computed pivot
    pub table: PivotTable,
}

impl PivotReport {
    /// Wrap a freshly computed table, stamped with the current time
    pub fn new(table: PivotTable, project: Option<String>) -> Self {
        Self {
            version: REPORT_SCHEMA_VERSION.to_string(),
            project,
            generated_at: Utc::now().to_rfc3339(),
            table,
        }
    }
}
