//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::records::Dimension;
use thiserror::Error;

/// Errors that can occur while aggregating purchase amounts
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PivotError {
    #[error("No {} declared; set up categories and stages before reporting", .0.plural())]
    NoDimensions(Dimension),

    #[error("Amount overflow while computing {0}")]
    Overflow(String),
}

/// Errors that can occur in the SQLite expense store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid purchase: {0}")]
    InvalidPurchase(String),

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Invalid amount in database: {0}")]
    InvalidAmount(String),

    #[error("Invalid date in database: {0}")]
    InvalidDate(String),

    #[error("Project not found: {0}")]
    ProjectNotFound(i64),

    #[error("Project {id} still has {count} purchases; delete them first")]
    ProjectHasPurchases { id: i64, count: i64 },

    #[error("Purchase not found: {0}")]
    PurchaseNotFound(i64),
}

/// Errors that can occur while loading a JSON snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
