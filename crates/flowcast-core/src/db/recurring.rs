//! Recurring transaction catalogue operations

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Frequency, NewRecurringTransaction, RecurringTransaction};

fn map_recurring_row(row: &Row<'_>) -> rusqlite::Result<RecurringTransaction> {
    let freq_str: String = row.get(4)?;
    let last_date_str: String = row.get(6)?;
    let next_date_str: String = row.get(7)?;
    let created_at_str: String = row.get(11)?;
    let updated_at_str: String = row.get(12)?;

    Ok(RecurringTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        merchant_name: row.get(2)?,
        amount: row.get(3)?,
        frequency: freq_str.parse().unwrap_or(Frequency::Monthly),
        day_of_month: row.get(5)?,
        last_date: parse_date(&last_date_str),
        next_predicted_date: parse_date(&next_date_str),
        category: row.get(8)?,
        confidence: row.get(9)?,
        is_active: row.get(10)?,
        created_at: parse_datetime(&created_at_str),
        updated_at: parse_datetime(&updated_at_str),
    })
}

const RECURRING_COLUMNS: &str = "id, user_id, merchant_name, amount, frequency, day_of_month, \
     last_date, next_predicted_date, category, confidence, is_active, created_at, updated_at";

impl Database {
    /// Insert a new recurring transaction into the catalogue
    pub fn insert_recurring(
        &self,
        new: &NewRecurringTransaction,
        next_predicted_date: NaiveDate,
    ) -> Result<RecurringTransaction> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO recurring_transactions (
                user_id, merchant_name, amount, frequency, day_of_month,
                last_date, next_predicted_date, category, confidence, is_active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)
            "#,
            params![
                new.user_id,
                new.merchant_name,
                new.amount,
                new.frequency.as_str(),
                new.day_of_month,
                new.last_date.to_string(),
                next_predicted_date.to_string(),
                new.category,
                new.confidence,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.get_recurring(id)?
            .ok_or_else(|| Error::NotFound(format!("recurring transaction {}", id)))
    }

    /// Get a recurring transaction by ID
    pub fn get_recurring(&self, id: i64) -> Result<Option<RecurringTransaction>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            &format!(
                "SELECT {} FROM recurring_transactions WHERE id = ?",
                RECURRING_COLUMNS
            ),
            params![id],
            map_recurring_row,
        );

        match result {
            Ok(tx) => Ok(Some(tx)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List active recurring transactions for a user, soonest due first
    pub fn list_active_recurring(&self, user_id: &str) -> Result<Vec<RecurringTransaction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM recurring_transactions \
             WHERE user_id = ? AND is_active = 1 \
             ORDER BY next_predicted_date ASC",
            RECURRING_COLUMNS
        ))?;

        let txs = stmt
            .query_map(params![user_id], map_recurring_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(txs)
    }

    /// List all recurring transactions for a user, including deactivated ones
    pub fn list_recurring(&self, user_id: &str) -> Result<Vec<RecurringTransaction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM recurring_transactions \
             WHERE user_id = ? \
             ORDER BY next_predicted_date ASC",
            RECURRING_COLUMNS
        ))?;

        let txs = stmt
            .query_map(params![user_id], map_recurring_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(txs)
    }

    /// Record a newly observed occurrence of a catalogued transaction
    ///
    /// Updates the observed amount, the last seen date, and the projected
    /// next date in one statement.
    pub fn update_recurring_occurrence(
        &self,
        id: i64,
        amount: f64,
        last_date: NaiveDate,
        next_predicted_date: NaiveDate,
    ) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE recurring_transactions
            SET amount = ?,
                last_date = ?,
                next_predicted_date = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                amount,
                last_date.to_string(),
                next_predicted_date.to_string(),
                id
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("recurring transaction {}", id)));
        }
        Ok(())
    }

    /// Deactivate a recurring transaction (stops future projections)
    pub fn deactivate_recurring(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE recurring_transactions \
             SET is_active = 0, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
            params![id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("recurring transaction {}", id)));
        }
        Ok(())
    }

    /// Delete a recurring transaction by ID
    pub fn delete_recurring(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM recurring_transactions WHERE id = ?",
            params![id],
        )?;
        Ok(())
    }

    /// List active recurring transactions due within a date range
    /// (by `next_predicted_date`)
    pub fn recurring_due_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RecurringTransaction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM recurring_transactions \
             WHERE user_id = ? AND is_active = 1 \
               AND next_predicted_date BETWEEN ? AND ? \
             ORDER BY next_predicted_date ASC",
            RECURRING_COLUMNS
        ))?;

        let txs = stmt
            .query_map(
                params![user_id, start.to_string(), end.to_string()],
                map_recurring_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(txs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(user_id: &str, merchant: &str, amount: f64) -> NewRecurringTransaction {
        NewRecurringTransaction {
            user_id: user_id.to_string(),
            merchant_name: merchant.to_string(),
            amount,
            frequency: Frequency::Monthly,
            day_of_month: Some(1),
            last_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            category: Some("Income".to_string()),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_insert_and_list_active() {
        let db = Database::in_memory().unwrap();

        let next = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let tx = db
            .insert_recurring(&sample_entry("user-1", "ACME PAYROLL", 3000.0), next)
            .unwrap();

        assert!(tx.id > 0);
        assert_eq!(tx.merchant_name, "ACME PAYROLL");
        assert_eq!(tx.frequency, Frequency::Monthly);
        assert_eq!(tx.next_predicted_date, next);
        assert!(tx.is_active);

        let active = db.list_active_recurring("user-1").unwrap();
        assert_eq!(active.len(), 1);

        // Other users see nothing
        assert!(db.list_active_recurring("user-2").unwrap().is_empty());
    }

    #[test]
    fn test_deactivate_removes_from_active_list() {
        let db = Database::in_memory().unwrap();
        let next = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let tx = db
            .insert_recurring(&sample_entry("user-1", "NETFLIX", -22.99), next)
            .unwrap();

        db.deactivate_recurring(tx.id).unwrap();

        assert!(db.list_active_recurring("user-1").unwrap().is_empty());
        assert_eq!(db.list_recurring("user-1").unwrap().len(), 1);
        assert!(!db.get_recurring(tx.id).unwrap().unwrap().is_active);
    }

    #[test]
    fn test_update_occurrence() {
        let db = Database::in_memory().unwrap();
        let next = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let tx = db
            .insert_recurring(&sample_entry("user-1", "RENT", -1800.0), next)
            .unwrap();

        let new_last = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let new_next = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        db.update_recurring_occurrence(tx.id, -1850.0, new_last, new_next)
            .unwrap();

        let updated = db.get_recurring(tx.id).unwrap().unwrap();
        assert!((updated.amount + 1850.0).abs() < f64::EPSILON);
        assert_eq!(updated.last_date, new_last);
        assert_eq!(updated.next_predicted_date, new_next);
    }

    #[test]
    fn test_due_between_filters_by_next_date() {
        let db = Database::in_memory().unwrap();
        db.insert_recurring(
            &sample_entry("user-1", "RENT", -1800.0),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        )
        .unwrap();
        db.insert_recurring(
            &sample_entry("user-1", "INSURANCE", -120.0),
            NaiveDate::from_ymd_opt(2026, 4, 15).unwrap(),
        )
        .unwrap();

        let due = db
            .recurring_due_between(
                "user-1",
                NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
            )
            .unwrap();

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].merchant_name, "RENT");
    }

    #[test]
    fn test_missing_id_errors() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_recurring(999).unwrap().is_none());
        assert!(db.deactivate_recurring(999).is_err());
    }
}
