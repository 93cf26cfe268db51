//! Upstream data providers
//!
//! The forecasting engine never talks to a bank or ledger directly; it pulls
//! transaction history and account balances through these traits. Swap in a
//! real aggregator client, a CSV export, or a fixture without touching the
//! prediction code.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AccountBalance, Transaction};

mod csv_history;
mod fixtures;

pub use csv_history::CsvHistory;
pub use fixtures::{StaticBalances, StaticHistory};

/// Source of historical transactions for a user
#[async_trait]
pub trait TransactionHistory: Send + Sync {
    /// Fetch the full available transaction history for a user.
    ///
    /// When `include_pending` is false, transactions still settling are
    /// filtered out before they reach the models.
    async fn historical_transactions(
        &self,
        user_id: &str,
        include_pending: bool,
    ) -> Result<Vec<Transaction>>;
}

/// Source of current account balances for a user
#[async_trait]
pub trait AccountBalances: Send + Sync {
    async fn account_balances(&self, user_id: &str) -> Result<Vec<AccountBalance>>;
}
