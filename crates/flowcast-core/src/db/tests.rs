//! Database tests

use super::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let recurring = db.list_recurring("user-1").unwrap();
        assert!(recurring.is_empty());
    }

    #[test]
    fn test_recurring_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('recurring_transactions') WHERE name IN ('id', 'user_id', 'merchant_name', 'amount', 'frequency', 'day_of_month', 'last_date', 'next_predicted_date', 'category', 'confidence', 'is_active', 'created_at', 'updated_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(
            result, 13,
            "recurring_transactions table should have 13 expected columns"
        );
    }

    #[test]
    fn test_predictions_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('cash_flow_predictions') WHERE name IN ('id', 'user_id', 'prediction_date', 'amount', 'confidence_low', 'confidence_high', 'model_type', 'timeframe', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(
            result, 9,
            "cash_flow_predictions table should have 9 expected columns"
        );
    }

    #[test]
    fn test_metrics_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('prediction_model_metrics') WHERE name IN ('id', 'user_id', 'model_type', 'accuracy', 'mean_absolute_error', 'mean_squared_error', 'root_mean_squared_error', 'validation_start_date', 'validation_end_date', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(
            result, 10,
            "prediction_model_metrics table should have 10 expected columns"
        );
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        // Opening the same file again re-runs migrations
        let reopened = Database::new_unencrypted(db.path()).unwrap();
        assert!(reopened.list_recurring("user-1").unwrap().is_empty());
    }

    #[test]
    fn test_unencrypted_db_reports_not_encrypted() {
        let db = Database::in_memory().unwrap();
        // FLOWCAST_DB_KEY is unset in tests
        if std::env::var(DB_KEY_ENV).is_err() {
            assert!(!db.is_encrypted().unwrap());
        }
    }

    #[test]
    fn test_parse_date_fallback() {
        let parsed = parse_date("2026-03-15");
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());

        // Garbage falls back to today rather than failing the row
        let fallback = parse_date("not-a-date");
        assert_eq!(fallback, Utc::now().date_naive());
    }
}
