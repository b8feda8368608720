//! Purchase records and their upstream sources.
//!
//! This module handles:
//! - The typed record model shared by the store and aggregators
//! - Loading JSON snapshots of declared dimensions and records

pub mod schema;
pub mod snapshot;

// Re-export main types
pub use schema::{Dimension, NewPurchase, Project, Purchase, PurchaseColumn, PurchaseRecord};
pub use snapshot::{parse_snapshot, read_snapshot, Snapshot};
