//! SQLite-backed expense store.
//!
//! One database file per user holds every project. Declared categories,
//! stages and payment modes live in their own tables and keep insertion order.

use super::validate::validate_purchase;
use crate::records::{NewPurchase, Project, Purchase, PurchaseColumn, PurchaseRecord};
use crate::utils::config::{DEFAULT_CATEGORIES, DEFAULT_PAYMENT_MODES, DEFAULT_STAGES};
use crate::utils::error::StorageError;
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "projects" (
    "project_id"        INTEGER,
    "project_name"      TEXT NOT NULL,
    "project_location"  TEXT,
    PRIMARY KEY("project_id" AUTOINCREMENT)
);

CREATE TABLE IF NOT EXISTS "purchases" (
    "purchase_id"       INTEGER,
    "project_id"        INTEGER NOT NULL,
    "item_name"         TEXT NOT NULL,
    "item_qty"          REAL,
    "unit"              TEXT,
    "vendor"            TEXT NOT NULL,
    "stage"             TEXT NOT NULL,
    "category"          TEXT NOT NULL,
    "date"              TEXT NOT NULL,
    "purchase_amount"   TEXT NOT NULL,
    "mode_of_payment"   TEXT NOT NULL,
    "paid_amount"       TEXT,
    "paid_by"           TEXT,
    "notes"             TEXT,
    PRIMARY KEY("purchase_id" AUTOINCREMENT),
    CONSTRAINT "project_fk" FOREIGN KEY("project_id") REFERENCES "projects"("project_id")
);

CREATE TABLE IF NOT EXISTS "stages" (
    "stage_id"  TEXT NOT NULL,
    "stage"     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS "category" (
    "category"  TEXT
);

CREATE TABLE IF NOT EXISTS "mode_of_payment" (
    "mode_of_payment"   TEXT
);
"#;

// Amounts are stored as decimal text. The CAST also reads files whose
// amount columns were created as REAL.
const PURCHASE_COLUMNS: &str = r#"
    purchase_id, project_id, item_name, item_qty, unit, vendor, stage, category, date,
    CAST(purchase_amount AS TEXT), mode_of_payment,
    COALESCE(CAST(paid_amount AS TEXT), '0'), paid_by, notes
"#;

/// Handle to one expense database
pub struct ExpenseStore {
    conn: Connection,
}

impl ExpenseStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        debug!("Opening expense database: {}", path.display());
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create missing tables and seed the default stages, categories and payment modes
    ///
    /// Safe to run repeatedly: existing values are never duplicated.
    pub fn initialize(&mut self) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(SCHEMA)?;

        for (stage_id, stage) in DEFAULT_STAGES {
            tx.execute(
                "INSERT INTO stages (stage_id, stage)
                 SELECT ?1, ?2
                 WHERE NOT EXISTS (SELECT 1 FROM stages WHERE stage_id = ?1 OR stage = ?2)",
                params![stage_id, stage],
            )?;
        }

        for category in DEFAULT_CATEGORIES {
            tx.execute(
                "INSERT INTO category (category)
                 SELECT ?1
                 WHERE NOT EXISTS (SELECT 1 FROM category WHERE category = ?1)",
                params![category],
            )?;
        }

        for mode in DEFAULT_PAYMENT_MODES {
            tx.execute(
                "INSERT INTO mode_of_payment (mode_of_payment)
                 SELECT ?1
                 WHERE NOT EXISTS (SELECT 1 FROM mode_of_payment WHERE mode_of_payment = ?1)",
                params![mode],
            )?;
        }

        tx.commit()?;
        info!("Database tables ready");
        Ok(())
    }

    /// Create a project and return its id
    pub fn create_project(&self, name: &str, location: Option<&str>) -> Result<i64, StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidProject(
                "project name is required".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO projects (project_name, project_location) VALUES (?1, ?2)",
            params![name, location],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("Created project {} - {}", id, name);
        Ok(id)
    }

    /// Rename or relocate a project
    pub fn update_project(
        &self,
        id: i64,
        name: &str,
        location: Option<&str>,
    ) -> Result<(), StorageError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StorageError::InvalidProject(
                "project name is required".to_string(),
            ));
        }

        let updated = self.conn.execute(
            "UPDATE projects SET project_name = ?1, project_location = ?2 WHERE project_id = ?3",
            params![name, location, id],
        )?;
        if updated == 0 {
            return Err(StorageError::ProjectNotFound(id));
        }

        info!("Updated project {} - {}", id, name);
        Ok(())
    }

    /// Delete a project that has no purchases
    ///
    /// The id sequence is wound back to the highest remaining id, so
    /// removing the newest project frees its id for the next one.
    pub fn delete_project(&mut self, id: i64) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM purchases WHERE project_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        if count > 0 {
            return Err(StorageError::ProjectHasPurchases { id, count });
        }

        let deleted = tx.execute("DELETE FROM projects WHERE project_id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StorageError::ProjectNotFound(id));
        }

        tx.execute(
            "UPDATE sqlite_sequence
             SET seq = (SELECT COALESCE(MAX(project_id), 0) FROM projects)
             WHERE name = 'projects'",
            [],
        )?;
        tx.commit()?;

        info!("Deleted project {}", id);
        Ok(())
    }

    pub fn projects(&self) -> Result<Vec<Project>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT project_id, project_name, project_location FROM projects ORDER BY project_id",
        )?;
        let projects = stmt
            .query_map([], |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    location: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    pub fn project(&self, id: i64) -> Result<Project, StorageError> {
        self.conn
            .query_row(
                "SELECT project_id, project_name, project_location FROM projects WHERE project_id = ?1",
                params![id],
                |row| {
                    Ok(Project {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        location: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or(StorageError::ProjectNotFound(id))
    }

    /// Declared categories, in insertion order
    pub fn categories(&self) -> Result<Vec<String>, StorageError> {
        self.column_values("SELECT category FROM category WHERE category IS NOT NULL ORDER BY rowid")
    }

    /// Declared stages, in insertion order
    pub fn stages(&self) -> Result<Vec<String>, StorageError> {
        self.column_values("SELECT stage FROM stages ORDER BY rowid")
    }

    pub fn payment_modes(&self) -> Result<Vec<String>, StorageError> {
        self.column_values(
            "SELECT mode_of_payment FROM mode_of_payment WHERE mode_of_payment IS NOT NULL ORDER BY rowid",
        )
    }

    /// Declare an extra category (no-op if it already exists)
    pub fn add_category(&self, category: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO category (category)
             SELECT ?1
             WHERE NOT EXISTS (SELECT 1 FROM category WHERE category = ?1)",
            params![category],
        )?;
        Ok(())
    }

    /// Declare an extra stage (no-op if it already exists)
    pub fn add_stage(&self, stage_id: &str, stage: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO stages (stage_id, stage)
             SELECT ?1, ?2
             WHERE NOT EXISTS (SELECT 1 FROM stages WHERE stage_id = ?1 OR stage = ?2)",
            params![stage_id, stage],
        )?;
        Ok(())
    }

    /// Validate and insert a purchase, returning its id
    pub fn add_purchase(&self, purchase: &NewPurchase) -> Result<i64, StorageError> {
        let purchase = validate_purchase(purchase)?;

        // Fails with ProjectNotFound before anything is written
        self.project(purchase.project_id)?;

        self.conn.execute(
            "INSERT INTO purchases
                (project_id, item_name, item_qty, unit, vendor, stage, category, date,
                 purchase_amount, mode_of_payment, paid_amount, paid_by, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                purchase.project_id,
                purchase.item_name,
                purchase.item_qty,
                purchase.unit,
                purchase.vendor,
                purchase.stage,
                purchase.category,
                purchase.date.format("%Y-%m-%d").to_string(),
                purchase.purchase_amount.to_string(),
                purchase.mode_of_payment,
                purchase.paid_amount.to_string(),
                purchase.paid_by,
                purchase.notes,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(
            "Inserted purchase {} ({} / {}: {})",
            id, purchase.category, purchase.stage, purchase.purchase_amount
        );
        Ok(id)
    }

    /// Stored purchases, optionally limited to one project
    pub fn purchases(&self, project_id: Option<i64>) -> Result<Vec<Purchase>, StorageError> {
        match project_id {
            Some(id) => self.query_purchases(
                &format!(
                    "SELECT {} FROM purchases WHERE project_id = ?1 ORDER BY purchase_id",
                    PURCHASE_COLUMNS
                ),
                params![id],
            ),
            None => self.query_purchases(
                &format!("SELECT {} FROM purchases ORDER BY purchase_id", PURCHASE_COLUMNS),
                [],
            ),
        }
    }

    /// Purchases whose `column` matches `value`, ignoring case and surrounding spaces
    pub fn purchases_by_column(
        &self,
        project_id: Option<i64>,
        column: PurchaseColumn,
        value: &str,
    ) -> Result<Vec<Purchase>, StorageError> {
        let filter = format!("trim(lower({})) = trim(lower(?1))", column.column_name());
        debug!("Filtering purchases on {} = '{}'", column.column_name(), value);

        match project_id {
            Some(id) => self.query_purchases(
                &format!(
                    "SELECT {} FROM purchases WHERE {} AND project_id = ?2 ORDER BY purchase_id",
                    PURCHASE_COLUMNS, filter
                ),
                params![value, id],
            ),
            None => self.query_purchases(
                &format!(
                    "SELECT {} FROM purchases WHERE {} ORDER BY purchase_id",
                    PURCHASE_COLUMNS, filter
                ),
                params![value],
            ),
        }
    }

    /// Distinct values of `column`, trimmed and lowercased
    pub fn distinct_values(
        &self,
        project_id: Option<i64>,
        column: PurchaseColumn,
    ) -> Result<Vec<String>, StorageError> {
        let value = format!("trim(lower({}))", column.column_name());
        match project_id {
            Some(id) => self.query_strings(
                &format!(
                    "SELECT DISTINCT {0} FROM purchases WHERE project_id = ?1 ORDER BY {0}",
                    value
                ),
                params![id],
            ),
            None => self.query_strings(
                &format!("SELECT DISTINCT {0} FROM purchases ORDER BY {0}", value),
                [],
            ),
        }
    }

    /// Records for the pivot aggregator
    pub fn pivot_records(&self, project_id: Option<i64>) -> Result<Vec<PurchaseRecord>, StorageError> {
        Ok(self
            .purchases(project_id)?
            .iter()
            .map(Purchase::record)
            .collect())
    }

    pub fn delete_purchase(&self, id: i64) -> Result<(), StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM purchases WHERE purchase_id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StorageError::PurchaseNotFound(id));
        }
        info!("Deleted purchase {}", id);
        Ok(())
    }

    fn query_purchases(&self, sql: &str, params: impl Params) -> Result<Vec<Purchase>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let raw_rows = stmt
            .query_map(params, RawPurchase::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        raw_rows.into_iter().map(RawPurchase::into_purchase).collect()
    }

    fn column_values(&self, sql: &str) -> Result<Vec<String>, StorageError> {
        self.query_strings(sql, [])
    }

    fn query_strings(&self, sql: &str, params: impl Params) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map(params, |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values)
    }
}

/// Row as it comes out of SQLite, before amount/date parsing
struct RawPurchase {
    id: i64,
    project_id: i64,
    item_name: String,
    item_qty: Option<f64>,
    unit: Option<String>,
    vendor: String,
    stage: String,
    category: String,
    date: String,
    purchase_amount: String,
    mode_of_payment: String,
    paid_amount: String,
    paid_by: Option<String>,
    notes: Option<String>,
}

impl RawPurchase {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            item_name: row.get(2)?,
            item_qty: row.get(3)?,
            unit: row.get(4)?,
            vendor: row.get(5)?,
            stage: row.get(6)?,
            category: row.get(7)?,
            date: row.get(8)?,
            purchase_amount: row.get(9)?,
            mode_of_payment: row.get(10)?,
            paid_amount: row.get(11)?,
            paid_by: row.get(12)?,
            notes: row.get(13)?,
        })
    }

    fn into_purchase(self) -> Result<Purchase, StorageError> {
        Ok(Purchase {
            id: self.id,
            project_id: self.project_id,
            date: parse_date(&self.date)?,
            purchase_amount: parse_amount(&self.purchase_amount)?,
            paid_amount: parse_amount(&self.paid_amount)?,
            item_name: self.item_name,
            item_qty: self.item_qty,
            unit: self.unit,
            vendor: self.vendor,
            stage: self.stage,
            category: self.category,
            mode_of_payment: self.mode_of_payment,
            paid_by: self.paid_by,
            notes: self.notes,
        })
    }
}

/// Parse a stored amount: decimal text, or SQLite's rendering of a REAL ("100.0", "1.0e+20")
fn parse_amount(text: &str) -> Result<Decimal, StorageError> {
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map(|d| d.normalize())
        .map_err(|_| StorageError::InvalidAmount(text.to_string()))
}

/// Dates are stored as ISO strings; tolerate a trailing time part
fn parse_date(text: &str) -> Result<NaiveDate, StorageError> {
    let day = text.trim().get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| StorageError::InvalidDate(text.to_string()))
}
