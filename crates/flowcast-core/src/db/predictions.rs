//! Persisted cash flow prediction operations
//!
//! Prediction rows are immutable: corrections are new inserts, never updates.
//! Old rows are removed with the prune operation.

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{CashFlowPrediction, ModelType, NewPrediction, Timeframe};

fn map_prediction_row(row: &Row<'_>) -> rusqlite::Result<CashFlowPrediction> {
    let date_str: String = row.get(2)?;
    let model_str: String = row.get(6)?;
    let timeframe_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;

    Ok(CashFlowPrediction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        prediction_date: parse_date(&date_str),
        amount: row.get(3)?,
        confidence_low: row.get(4)?,
        confidence_high: row.get(5)?,
        model_type: model_str.parse().unwrap_or(ModelType::Hybrid),
        timeframe: timeframe_str.parse().unwrap_or(Timeframe::Daily),
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Batch-insert prediction rows inside a single transaction
    ///
    /// All-or-nothing: a failed insert rolls the whole batch back, leaving
    /// no partial rows. Returns the number of rows written.
    pub fn insert_predictions(&self, user_id: &str, rows: &[NewPrediction]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO cash_flow_predictions (
                    user_id, prediction_date, amount, confidence_low,
                    confidence_high, model_type, timeframe
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )?;

            for row in rows {
                stmt.execute(params![
                    user_id,
                    row.prediction_date.to_string(),
                    row.amount,
                    row.confidence_low,
                    row.confidence_high,
                    row.model_type.as_str(),
                    row.timeframe.as_str(),
                ])?;
            }
        }

        tx.commit()?;
        Ok(rows.len())
    }

    /// Get predictions for a user within a date range
    pub fn predictions_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        timeframe: Timeframe,
    ) -> Result<Vec<CashFlowPrediction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, prediction_date, amount, confidence_low,
                   confidence_high, model_type, timeframe, created_at
            FROM cash_flow_predictions
            WHERE user_id = ?
              AND prediction_date BETWEEN ? AND ?
              AND timeframe = ?
            ORDER BY prediction_date ASC
            "#,
        )?;

        let predictions = stmt
            .query_map(
                params![
                    user_id,
                    start.to_string(),
                    end.to_string(),
                    timeframe.as_str()
                ],
                map_prediction_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(predictions)
    }

    /// Get the latest stored predictions dated today or later
    pub fn latest_predictions(
        &self,
        user_id: &str,
        model_type: ModelType,
        timeframe: Timeframe,
        limit: i64,
    ) -> Result<Vec<CashFlowPrediction>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, prediction_date, amount, confidence_low,
                   confidence_high, model_type, timeframe, created_at
            FROM cash_flow_predictions
            WHERE user_id = ?
              AND model_type = ?
              AND timeframe = ?
              AND prediction_date >= DATE('now')
            ORDER BY prediction_date ASC
            LIMIT ?
            "#,
        )?;

        let predictions = stmt
            .query_map(
                params![user_id, model_type.as_str(), timeframe.as_str(), limit],
                map_prediction_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(predictions)
    }

    /// Prune predictions dated strictly before a cutoff
    ///
    /// Returns the number of rows removed.
    pub fn delete_predictions_before(&self, user_id: &str, cutoff: NaiveDate) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM cash_flow_predictions \
             WHERE user_id = ? AND prediction_date < ?",
            params![user_id, cutoff.to_string()],
        )?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows(start: NaiveDate, count: u32) -> Vec<NewPrediction> {
        (0..count)
            .map(|i| NewPrediction {
                prediction_date: start + chrono::Duration::days(i as i64),
                amount: -42.5 + i as f64,
                confidence_low: -60.0 + i as f64,
                confidence_high: -25.0 + i as f64,
                model_type: ModelType::Hybrid,
                timeframe: Timeframe::Daily,
            })
            .collect()
    }

    #[test]
    fn test_batch_insert_round_trip() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let rows = sample_rows(start, 5);

        let written = db.insert_predictions("user-1", &rows).unwrap();
        assert_eq!(written, 5);

        let fetched = db
            .predictions_between(
                "user-1",
                start,
                start + chrono::Duration::days(4),
                Timeframe::Daily,
            )
            .unwrap();

        assert_eq!(fetched.len(), 5);
        for (row, stored) in rows.iter().zip(&fetched) {
            assert_eq!(stored.prediction_date, row.prediction_date);
            assert!((stored.amount - row.amount).abs() < 1e-9);
            assert!((stored.confidence_low - row.confidence_low).abs() < 1e-9);
            assert!((stored.confidence_high - row.confidence_high).abs() < 1e-9);
            assert_eq!(stored.model_type, ModelType::Hybrid);
            assert_eq!(stored.timeframe, Timeframe::Daily);
        }
    }

    #[test]
    fn test_date_range_excludes_outside_rows() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        db.insert_predictions("user-1", &sample_rows(start, 10))
            .unwrap();

        let fetched = db
            .predictions_between(
                "user-1",
                start + chrono::Duration::days(2),
                start + chrono::Duration::days(4),
                Timeframe::Daily,
            )
            .unwrap();

        assert_eq!(fetched.len(), 3);
        assert_eq!(
            fetched[0].prediction_date,
            start + chrono::Duration::days(2)
        );
    }

    #[test]
    fn test_prune_before_cutoff() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        db.insert_predictions("user-1", &sample_rows(start, 10))
            .unwrap();

        let removed = db
            .delete_predictions_before("user-1", start + chrono::Duration::days(5))
            .unwrap();
        assert_eq!(removed, 5);

        let remaining = db
            .predictions_between(
                "user-1",
                start,
                start + chrono::Duration::days(9),
                Timeframe::Daily,
            )
            .unwrap();
        assert_eq!(remaining.len(), 5);
    }

    #[test]
    fn test_latest_predictions_only_future_rows() {
        let db = Database::in_memory().unwrap();
        let today = chrono::Utc::now().date_naive();

        // One row in the past, three today or later
        let mut rows = sample_rows(today - chrono::Duration::days(1), 4);
        rows[0].model_type = ModelType::Hybrid;
        db.insert_predictions("user-1", &rows).unwrap();

        let latest = db
            .latest_predictions("user-1", ModelType::Hybrid, Timeframe::Daily, 30)
            .unwrap();

        assert_eq!(latest.len(), 3);
        assert!(latest.iter().all(|p| p.prediction_date >= today));
    }
}
