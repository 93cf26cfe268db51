//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Flowcast - Forecast your cash flow
#[derive(Parser)]
#[command(name = "flowcast")]
#[command(about = "Self-hosted cash flow forecaster", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "flowcast.db", global = true)]
    pub db: PathBuf,

    /// User identifier (all data is namespaced per user)
    #[arg(short, long, default_value = "default", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set FLOWCAST_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Generate a cash flow forecast
    Predict {
        /// CSV file with transaction history (date,amount,category,merchant,pending)
        #[arg(short = 'f', long)]
        history: PathBuf,

        /// Current account balance (repeat for multiple accounts)
        #[arg(short, long)]
        balance: Vec<f64>,

        /// Model: time-series, recurring-transaction, hybrid
        #[arg(short, long, default_value = "hybrid")]
        model: String,

        /// Forecast horizon in days
        #[arg(short, long, default_value = "90")]
        days: i64,

        /// Confidence level for intervals (0.80, 0.90, 0.95, 0.99)
        #[arg(short, long, default_value = "0.95")]
        confidence: f64,

        /// Ignore the recurring transaction catalogue
        #[arg(long)]
        no_recurring: bool,

        /// Exclude pending transactions from the history
        #[arg(long)]
        exclude_pending: bool,

        /// Print the full result as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Cross-validate a model against transaction history
    Validate {
        /// CSV file with transaction history
        #[arg(short = 'f', long)]
        history: PathBuf,

        /// Model: time-series, recurring-transaction, hybrid
        #[arg(short, long, default_value = "hybrid")]
        model: String,

        /// Number of validation folds
        #[arg(short = 'k', long, default_value = "5")]
        folds: usize,
    },

    /// Show stored validation metrics
    Metrics {
        /// Model: time-series, recurring-transaction, hybrid
        #[arg(short, long, default_value = "hybrid")]
        model: String,

        /// Show up to this many past validation runs
        #[arg(long, default_value = "10")]
        history_limit: i64,

        /// Show cross-user averages for the trailing 30 days
        #[arg(long)]
        average: bool,
    },

    /// Manage the recurring transaction catalogue
    Recurring {
        #[command(subcommand)]
        action: Option<RecurringAction>,
    },

    /// Inspect and prune stored predictions
    Predictions {
        #[command(subcommand)]
        action: PredictionsAction,
    },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List active recurring transactions (default)
    List {
        /// Include deactivated entries
        #[arg(long)]
        all: bool,
    },

    /// Add a recurring transaction
    Add {
        /// Merchant name
        #[arg(short, long)]
        merchant: String,

        /// Amount (negative = expense, positive = income)
        #[arg(short, long)]
        amount: f64,

        /// Frequency: weekly, biweekly, monthly, quarterly, annual
        #[arg(short, long)]
        frequency: String,

        /// Day of month (for monthly schedules)
        #[arg(long)]
        day_of_month: Option<u32>,

        /// Last observed date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        last_date: Option<String>,

        /// Category label
        #[arg(short, long)]
        category: Option<String>,

        /// Detection confidence (0.0 - 1.0)
        #[arg(long, default_value = "1.0")]
        confidence: f64,
    },

    /// Deactivate a recurring transaction (stops future projections)
    Deactivate {
        /// Recurring transaction ID
        id: i64,
    },

    /// Delete a recurring transaction
    Delete {
        /// Recurring transaction ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum PredictionsAction {
    /// List stored predictions in a date range
    List {
        /// Range start (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// Show the latest stored predictions (today onward)
    Latest {
        /// Model: time-series, recurring-transaction, hybrid
        #[arg(short, long, default_value = "hybrid")]
        model: String,

        /// Maximum rows to show
        #[arg(long, default_value = "30")]
        limit: i64,
    },

    /// Delete predictions dated before a cutoff
    Prune {
        /// Cutoff date (YYYY-MM-DD); rows strictly before it are removed
        #[arg(long)]
        before: String,
    },
}
