//! CSV-backed transaction history provider
//!
//! Reads a transaction export with the columns
//! `date,amount,category,merchant,pending`. Empty category and merchant
//! cells become `None`; the pending column accepts `true`/`false` and `1`/`0`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;

use super::TransactionHistory;

/// Transaction history sourced from a CSV export on disk
pub struct CsvHistory {
    path: PathBuf,
}

impl CsvHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<Vec<Transaction>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut transactions = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            // Header is row 1, so data rows start at 2
            let line = i + 2;

            let date_field = record
                .get(0)
                .ok_or_else(|| Error::InvalidData(format!("row {}: missing date", line)))?;
            let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d").map_err(|_| {
                Error::InvalidData(format!("row {}: invalid date '{}'", line, date_field))
            })?;

            let amount_field = record
                .get(1)
                .ok_or_else(|| Error::InvalidData(format!("row {}: missing amount", line)))?;
            let amount: f64 = amount_field.parse().map_err(|_| {
                Error::InvalidData(format!("row {}: invalid amount '{}'", line, amount_field))
            })?;

            let category = record.get(2).filter(|s| !s.is_empty()).map(String::from);
            let merchant_name = record.get(3).filter(|s| !s.is_empty()).map(String::from);
            let pending = matches!(record.get(4), Some("true") | Some("1"));

            transactions.push(Transaction {
                date,
                amount,
                category,
                merchant_name,
                pending,
            });
        }

        debug!(rows = transactions.len(), path = %self.path.display(), "Loaded transaction history");
        Ok(transactions)
    }
}

#[async_trait]
impl TransactionHistory for CsvHistory {
    async fn historical_transactions(
        &self,
        _user_id: &str,
        include_pending: bool,
    ) -> Result<Vec<Transaction>> {
        let mut transactions = self.read_all()?;
        if !include_pending {
            transactions.retain(|t| !t.pending);
        }
        Ok(transactions)
    }
}
