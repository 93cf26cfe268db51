//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `parse_model` / `parse_date_arg` - Shared argument parsing helpers
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use flowcast_core::{db::Database, models::ModelType};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path.to_str().unwrap();
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Parse a model name argument
pub fn parse_model(model: &str) -> Result<ModelType> {
    model
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown model: {} (use time-series, recurring-transaction, or hybrid)", model))
}

/// Parse a YYYY-MM-DD date argument
pub fn parse_date_arg(date: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} format (use YYYY-MM-DD)", flag))
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Catalogue recurring payments: flowcast recurring add --merchant RENT --amount -1800 --frequency monthly");
    println!("  2. Generate a forecast: flowcast predict -f history.csv --balance 2500");

    Ok(())
}
