//! JSON snapshots of declared dimensions plus purchase records.
//!
//! A snapshot is an alternative upstream source to the SQLite store:
//!
//! ```json
//! {
//!   "categories": ["Material", "Joinery"],
//!   "stages": ["Basement", "Roof"],
//!   "records": [{ "amount": 100.5, "category": "Material", "stage": "Basement" }]
//! }
//! ```

use super::schema::PurchaseRecord;
use crate::utils::error::SnapshotError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Declared dimensions and records, as read from disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub stages: Vec<String>,

    #[serde(default)]
    pub records: Vec<PurchaseRecord>,
}

/// Read a snapshot from a JSON file
///
/// # Errors
/// * `SnapshotError::Io` - file cannot be opened
/// * `SnapshotError::Json` - file is not a valid snapshot
pub fn read_snapshot(input_path: impl AsRef<Path>) -> Result<Snapshot, SnapshotError> {
    let input_path = input_path.as_ref();

    debug!("Reading snapshot from: {}", input_path.display());

    let file = File::open(input_path)?;
    let snapshot = parse_snapshot(BufReader::new(file))?;

    debug!(
        "Snapshot loaded: {} categories, {} stages, {} records",
        snapshot.categories.len(),
        snapshot.stages.len(),
        snapshot.records.len()
    );

    Ok(snapshot)
}

/// Parse a snapshot from any reader
pub fn parse_snapshot(reader: impl std::io::Read) -> Result<Snapshot, SnapshotError> {
    Ok(serde_json::from_reader(reader)?)
}
