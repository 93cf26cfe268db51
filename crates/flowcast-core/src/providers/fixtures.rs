//! In-memory providers for tests and CLI flag input

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AccountBalance, Transaction};

use super::{AccountBalances, TransactionHistory};

/// Transaction history served from a fixed in-memory list
pub struct StaticHistory {
    transactions: Vec<Transaction>,
}

impl StaticHistory {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

#[async_trait]
impl TransactionHistory for StaticHistory {
    async fn historical_transactions(
        &self,
        _user_id: &str,
        include_pending: bool,
    ) -> Result<Vec<Transaction>> {
        let mut transactions = self.transactions.clone();
        if !include_pending {
            transactions.retain(|t| !t.pending);
        }
        Ok(transactions)
    }
}

/// Account balances served from a fixed in-memory list
pub struct StaticBalances {
    balances: Vec<AccountBalance>,
}

impl StaticBalances {
    pub fn new(balances: Vec<AccountBalance>) -> Self {
        Self { balances }
    }

    /// Build from plain amounts, one synthetic account per value
    pub fn from_amounts(amounts: &[f64]) -> Self {
        let balances = amounts
            .iter()
            .enumerate()
            .map(|(i, &balance)| AccountBalance {
                account_id: format!("account-{}", i + 1),
                name: format!("Account {}", i + 1),
                balance,
            })
            .collect();
        Self { balances }
    }
}

#[async_trait]
impl AccountBalances for StaticBalances {
    async fn account_balances(&self, _user_id: &str) -> Result<Vec<AccountBalance>> {
        Ok(self.balances.clone())
    }
}
