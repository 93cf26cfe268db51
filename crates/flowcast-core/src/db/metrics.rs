//! Model validation metrics operations

use chrono::NaiveDate;
use rusqlite::{params, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{AverageMetrics, ModelMetrics, ModelType, ValidationMetrics};

fn map_metrics_row(row: &Row<'_>) -> rusqlite::Result<ModelMetrics> {
    let model_str: String = row.get(2)?;
    let start_str: String = row.get(7)?;
    let end_str: String = row.get(8)?;
    let created_at_str: String = row.get(9)?;

    Ok(ModelMetrics {
        id: row.get(0)?,
        user_id: row.get(1)?,
        model_type: model_str.parse().unwrap_or(ModelType::Hybrid),
        accuracy: row.get(3)?,
        mean_absolute_error: row.get(4)?,
        mean_squared_error: row.get(5)?,
        root_mean_squared_error: row.get(6)?,
        validation_start_date: parse_date(&start_str),
        validation_end_date: parse_date(&end_str),
        created_at: parse_datetime(&created_at_str),
    })
}

const METRICS_COLUMNS: &str = "id, user_id, model_type, accuracy, mean_absolute_error, \
     mean_squared_error, root_mean_squared_error, validation_start_date, \
     validation_end_date, created_at";

impl Database {
    /// Record the metrics of one validation run
    pub fn insert_model_metrics(
        &self,
        user_id: &str,
        model_type: ModelType,
        metrics: &ValidationMetrics,
        validation_start: NaiveDate,
        validation_end: NaiveDate,
    ) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO prediction_model_metrics (
                user_id, model_type, accuracy, mean_absolute_error,
                mean_squared_error, root_mean_squared_error,
                validation_start_date, validation_end_date
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                model_type.as_str(),
                metrics.accuracy,
                metrics.mean_absolute_error,
                metrics.mean_squared_error,
                metrics.root_mean_squared_error,
                validation_start.to_string(),
                validation_end.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get the most recent metrics for a model
    pub fn latest_model_metrics(
        &self,
        user_id: &str,
        model_type: ModelType,
    ) -> Result<Option<ModelMetrics>> {
        let conn = self.conn()?;

        let result = conn.query_row(
            &format!(
                "SELECT {} FROM prediction_model_metrics \
                 WHERE user_id = ? AND model_type = ? \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT 1",
                METRICS_COLUMNS
            ),
            params![user_id, model_type.as_str()],
            map_metrics_row,
        );

        match result {
            Ok(metrics) => Ok(Some(metrics)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get validation history for a model, newest first
    pub fn model_metrics_history(
        &self,
        user_id: &str,
        model_type: ModelType,
        limit: i64,
    ) -> Result<Vec<ModelMetrics>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM prediction_model_metrics \
             WHERE user_id = ? AND model_type = ? \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?",
            METRICS_COLUMNS
        ))?;

        let history = stmt
            .query_map(params![user_id, model_type.as_str(), limit], map_metrics_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(history)
    }

    /// Average metrics across all users for a model type, trailing 30 days
    pub fn average_model_metrics(&self, model_type: ModelType) -> Result<AverageMetrics> {
        let conn = self.conn()?;

        let averages = conn.query_row(
            r#"
            SELECT
                COALESCE(AVG(accuracy), 0),
                COALESCE(AVG(mean_absolute_error), 0),
                COALESCE(AVG(mean_squared_error), 0),
                COALESCE(AVG(root_mean_squared_error), 0)
            FROM prediction_model_metrics
            WHERE model_type = ?
              AND created_at >= datetime('now', '-30 days')
            "#,
            params![model_type.as_str()],
            |row| {
                Ok(AverageMetrics {
                    avg_accuracy: row.get(0)?,
                    avg_mean_absolute_error: row.get(1)?,
                    avg_mean_squared_error: row.get(2)?,
                    avg_root_mean_squared_error: row.get(3)?,
                })
            },
        )?;

        Ok(averages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics(accuracy: f64) -> ValidationMetrics {
        ValidationMetrics {
            accuracy,
            mean_absolute_error: 12.0,
            mean_squared_error: 250.0,
            root_mean_squared_error: 250.0_f64.sqrt(),
            direction_accuracy: 80.0,
            r2_score: 65.0,
        }
    }

    #[test]
    fn test_insert_and_latest() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        db.insert_model_metrics("user-1", ModelType::Hybrid, &sample_metrics(72.0), start, end)
            .unwrap();
        db.insert_model_metrics("user-1", ModelType::Hybrid, &sample_metrics(81.0), start, end)
            .unwrap();

        let latest = db
            .latest_model_metrics("user-1", ModelType::Hybrid)
            .unwrap()
            .unwrap();

        assert!((latest.accuracy - 81.0).abs() < 1e-9);
        assert_eq!(latest.validation_start_date, start);
        assert_eq!(latest.validation_end_date, end);
        assert_eq!(latest.model_type, ModelType::Hybrid);
    }

    #[test]
    fn test_latest_is_none_for_unknown_model() {
        let db = Database::in_memory().unwrap();
        assert!(db
            .latest_model_metrics("user-1", ModelType::TimeSeries)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_history_limit() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        for i in 0..5 {
            db.insert_model_metrics(
                "user-1",
                ModelType::Hybrid,
                &sample_metrics(50.0 + i as f64),
                start,
                end,
            )
            .unwrap();
        }

        let history = db
            .model_metrics_history("user-1", ModelType::Hybrid, 3)
            .unwrap();
        assert_eq!(history.len(), 3);
        // Newest first
        assert!((history[0].accuracy - 54.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_user_averages() {
        let db = Database::in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        db.insert_model_metrics("user-1", ModelType::Hybrid, &sample_metrics(60.0), start, end)
            .unwrap();
        db.insert_model_metrics("user-2", ModelType::Hybrid, &sample_metrics(80.0), start, end)
            .unwrap();
        // Different model type must not contribute
        db.insert_model_metrics(
            "user-3",
            ModelType::TimeSeries,
            &sample_metrics(10.0),
            start,
            end,
        )
        .unwrap();

        let averages = db.average_model_metrics(ModelType::Hybrid).unwrap();
        assert!((averages.avg_accuracy - 70.0).abs() < 1e-9);

        // Empty result set averages to zero
        let empty = db
            .average_model_metrics(ModelType::RecurringTransaction)
            .unwrap();
        assert_eq!(empty.avg_accuracy, 0.0);
    }
}
