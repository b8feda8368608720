//! Configuration and constants for the CLI.

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Default database file (overridable with `--db` or `EXPENSE_PIVOT_DB`)
pub const DEFAULT_DB_PATH: &str = "expenses.db";

/// Environment variable consulted for the database path
pub const DB_PATH_ENV: &str = "EXPENSE_PIVOT_DB";

// Synthetic labels appended to pivot rows and columns
pub const GRAND_TOTAL_LABEL: &str = "Grand Total";
pub const TOTAL_LABEL: &str = "Total";
pub const PERCENTAGE_LABEL: &str = "Percentage";

/// Decimal places kept on percentage cells
pub const PERCENTAGE_DECIMAL_PLACES: u32 = 2;

/// Currency symbol used by the text renderer
pub const CURRENCY_SYMBOL: &str = "₹";

/// Payment mode that means nothing has been paid yet
pub const NO_PAYMENT_MODE: &str = "No Payment";

/// Label shown for a category or stage with no purchases at all
pub const NOT_YET_STARTED_LABEL: &str = "Not Yet Started";

// Seed data written by `init`
pub const DEFAULT_STAGES: &[(&str, &str)] = &[
    ("STAGE-1", "Basement"),
    ("STAGE-2", "Roof"),
    ("STAGE-3", "Masonry"),
    ("STAGE-4", "Finishes"),
    ("STAGE-5", "Site Work and Fixtures"),
];

pub const DEFAULT_CATEGORIES: &[&str] = &[
    "General",
    "Material",
    "MEP Labour",
    "Mason Labour",
    "Misc Civil Labour",
    "Paint Labour",
    "Tiling Labour",
    "Joinery",
];

pub const DEFAULT_PAYMENT_MODES: &[&str] = &[
    NO_PAYMENT_MODE,
    "UPI",
    "Credit Card",
    "Debit Card",
    "Cash",
    "Bank Transfer",
];

/// Units offered for item quantities
pub const KNOWN_UNITS: &[&str] = &["Nos", "MT", "Liters", "Units", "Kg", "Others"];
