//! Expense Pivot CLI
//!
//! Records construction purchases in a local SQLite file and prints
//! category x stage pivot reports.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use env_logger::Env;
use rust_decimal::Decimal;
use std::path::PathBuf;

use expense_pivot::commands::{
    display_version, execute_add_project, execute_add_purchase, execute_declare,
    execute_delete_project, execute_delete_purchase, execute_edit_project, execute_expenditure,
    execute_init, execute_list_projects, execute_list_purchases, execute_list_values,
    execute_report, validate_args, validate_report_file, AddPurchaseArgs, DeclareTarget,
    ExpenditureArgs, ReportArgs,
};
use expense_pivot::records::{Dimension, PurchaseColumn};
use expense_pivot::utils::config::{DB_PATH_ENV, DEFAULT_DB_PATH, NO_PAYMENT_MODE};

/// Expense Pivot - construction purchase tracking and pivot reports
#[derive(Parser, Debug)]
#[command(name = "expense-pivot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// SQLite database file
    #[arg(long, global = true, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database and seed default stages, categories and payment modes
    Init,

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Declare an extra category or stage
    Declare {
        #[command(subcommand)]
        target: DeclareAction,
    },

    /// Record, list or delete purchases
    Purchase {
        #[command(subcommand)]
        action: PurchaseAction,
    },

    /// Print the category x stage pivot report
    Report {
        /// Limit to one project id
        #[arg(short, long)]
        project: Option<i64>,

        /// Read categories, stages and records from a JSON snapshot instead of the database
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not print the text table
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print purchased vs paid amounts per category or stage
    Expenditure {
        /// Group by "category" or "stage"
        #[arg(long, default_value = "category")]
        by: Dimension,

        /// Limit to one project id
        #[arg(short, long)]
        project: Option<i64>,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

#[derive(Subcommand, Debug)]
enum ProjectAction {
    /// Create a project
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        location: Option<String>,
    },

    /// List projects
    List,

    /// Rename or relocate a project
    Edit {
        #[arg(long)]
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        location: Option<String>,
    },

    /// Delete a project that has no purchases
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum DeclareAction {
    /// Declare a category
    Category { name: String },

    /// Declare a stage
    Stage {
        name: String,

        /// Stage id (defaults to the next STAGE-<n>)
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PurchaseAction {
    /// Record a purchase
    Add {
        #[arg(short, long)]
        project: i64,

        /// Item name
        #[arg(short, long)]
        item: String,

        #[arg(long)]
        vendor: String,

        #[arg(long)]
        stage: String,

        #[arg(long)]
        category: String,

        /// Purchase amount (negative for refunds)
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Decimal,

        /// Amount paid so far
        #[arg(long, default_value = "0")]
        paid: Decimal,

        /// Mode of payment
        #[arg(long, default_value = NO_PAYMENT_MODE)]
        mode: String,

        /// Who paid the amount
        #[arg(long)]
        paid_by: Option<String>,

        #[arg(long)]
        qty: Option<f64>,

        #[arg(long)]
        unit: Option<String>,

        /// Purchase date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List purchases
    List {
        #[arg(short, long)]
        project: Option<i64>,

        /// Filter on a column: category, vendor, stage or mode-of-payment
        #[arg(long, requires = "value")]
        by: Option<PurchaseColumn>,

        /// Value to match (case and surrounding spaces ignored)
        #[arg(long, requires = "by")]
        value: Option<String>,
    },

    /// List the distinct values of a purchase column
    Values {
        /// Column: category, vendor, stage or mode-of-payment
        #[arg(long)]
        by: PurchaseColumn,

        #[arg(short, long)]
        project: Option<i64>,
    },

    /// Delete a purchase by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let db = cli.db;

    match cli.command {
        Commands::Init => execute_init(&db)?,

        Commands::Project { action } => match action {
            ProjectAction::Add { name, location } => {
                execute_add_project(&db, &name, location.as_deref())?;
            }
            ProjectAction::List => {
                execute_list_projects(&db)?;
            }
            ProjectAction::Edit { id, name, location } => {
                execute_edit_project(&db, id, name.as_deref(), location.as_deref())?;
            }
            ProjectAction::Delete { id } => execute_delete_project(&db, id)?,
        },

        Commands::Declare { target } => {
            let target = match target {
                DeclareAction::Category { name } => DeclareTarget::Category(name),
                DeclareAction::Stage { name, id } => DeclareTarget::Stage { name, id },
            };
            execute_declare(&db, target)?;
        }

        Commands::Purchase { action } => match action {
            PurchaseAction::Add {
                project,
                item,
                vendor,
                stage,
                category,
                amount,
                paid,
                mode,
                paid_by,
                qty,
                unit,
                date,
                notes,
            } => {
                let args = AddPurchaseArgs {
                    db_path: db,
                    project_id: project,
                    item_name: item,
                    item_qty: qty,
                    unit,
                    vendor,
                    stage,
                    category,
                    date,
                    purchase_amount: amount,
                    mode_of_payment: mode,
                    paid_amount: paid,
                    paid_by,
                    notes,
                };
                execute_add_purchase(args)?;
            }
            PurchaseAction::List { project, by, value } => {
                let filter = by.zip(value.as_deref());
                execute_list_purchases(&db, project, filter)?;
            }
            PurchaseAction::Values { by, project } => {
                execute_list_values(&db, project, by)?;
            }
            PurchaseAction::Delete { id } => execute_delete_purchase(&db, id)?,
        },

        Commands::Report {
            project,
            snapshot,
            output,
            quiet,
        } => {
            let args = ReportArgs {
                db_path: db,
                project_id: project,
                snapshot,
                output_json: output,
                print_table: !quiet,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(&args)?;
        }

        Commands::Expenditure { by, project } => {
            let args = ExpenditureArgs {
                db_path: db,
                dimension: by,
                project_id: project,
                print_table: true,
            };
            execute_expenditure(&args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Version => display_version(),
    }

    Ok(())
}
