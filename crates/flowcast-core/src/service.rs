//! Prediction service
//!
//! Orchestrates the full forecast pipeline: pull history and balances from
//! the providers, run the configured model, persist the daily rows, roll up
//! the aggregates, and scan for risk alerts.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::forecast::{self, aggregate, alerts, build_daily_series, recurring};
use crate::models::{
    MetricsSummary, ModelType, ModelValidation, NewPrediction, NewRecurringTransaction,
    PredictionConfig, PredictionResult, RecurringTransaction, Timeframe, ValidationPeriod,
};
use crate::providers::{AccountBalances, TransactionHistory};
use crate::validation::cross_validate;

/// Cash flow prediction service
pub struct PredictionService {
    db: Database,
    history: Arc<dyn TransactionHistory>,
    balances: Arc<dyn AccountBalances>,
}

impl PredictionService {
    pub fn new(
        db: Database,
        history: Arc<dyn TransactionHistory>,
        balances: Arc<dyn AccountBalances>,
    ) -> Self {
        Self {
            db,
            history,
            balances,
        }
    }

    /// Run a full forecast for a user.
    ///
    /// Persists the daily predictions before returning; the rollups and
    /// alerts are computed from the same daily rows the caller receives.
    pub async fn generate_predictions(
        &self,
        user_id: &str,
        config: &PredictionConfig,
    ) -> Result<PredictionResult> {
        config.validate()?;

        let transactions = self
            .history
            .historical_transactions(user_id, config.include_pending_transactions)
            .await
            .map_err(|e| Error::Upstream(format!("transaction history: {e}")))?;
        if transactions.is_empty() {
            return Err(Error::InsufficientHistory {
                required: 1,
                available: 0,
            });
        }

        let recurring = if config.include_recurring_transactions {
            self.db.list_active_recurring(user_id)?
        } else {
            Vec::new()
        };

        let balances = self
            .balances
            .account_balances(user_id)
            .await
            .map_err(|e| Error::Upstream(format!("account balances: {e}")))?;
        let opening_balance: f64 = balances.iter().map(|b| b.balance).sum();

        info!(
            user_id,
            model = %config.model_type,
            days = config.timeframe_in_days,
            transactions = transactions.len(),
            recurring = recurring.len(),
            "Generating cash flow predictions"
        );

        let series = build_daily_series(&transactions);
        let start = Utc::now().date_naive();
        let daily = forecast::run_model(
            config.model_type,
            &series,
            &recurring,
            start,
            config.timeframe_in_days,
            config.confidence_level,
        )?;

        let rows: Vec<NewPrediction> = daily
            .iter()
            .map(|d| NewPrediction {
                prediction_date: d.date,
                amount: d.value,
                confidence_low: d.confidence_low,
                confidence_high: d.confidence_high,
                model_type: config.model_type,
                timeframe: Timeframe::Daily,
            })
            .collect();
        let written = self.db.insert_predictions(user_id, &rows)?;
        info!(user_id, rows = written, "Persisted daily predictions");

        let weekly_predictions = aggregate::aggregate_weekly(&daily);
        let monthly_predictions = aggregate::aggregate_monthly(&daily);
        let total_prediction = aggregate::total(&daily);
        let alerts = alerts::generate_alerts(&daily, opening_balance);

        if !alerts.is_empty() {
            info!(user_id, count = alerts.len(), "Forecast raised alerts");
        }

        Ok(PredictionResult {
            daily_predictions: daily,
            weekly_predictions,
            monthly_predictions,
            total_prediction,
            alerts,
        })
    }

    /// List the user's active recurring transactions
    pub fn get_recurring_transactions(&self, user_id: &str) -> Result<Vec<RecurringTransaction>> {
        self.db.list_active_recurring(user_id)
    }

    /// Add a recurring transaction to the catalogue.
    ///
    /// The next occurrence is projected from the schedule before insertion.
    pub fn add_recurring_transaction(
        &self,
        new: &NewRecurringTransaction,
    ) -> Result<RecurringTransaction> {
        let next = recurring::next_occurrence(
            new.frequency,
            new.day_of_month,
            new.last_date,
            new.last_date,
        )
        .ok_or_else(|| {
            Error::InvalidData(format!(
                "no next occurrence found for {} schedule",
                new.frequency
            ))
        })?;
        self.db.insert_recurring(new, next)
    }

    /// Report the most recent validation run for a model.
    ///
    /// Users with no validation history get a zeroed report dated today,
    /// not an error.
    pub fn get_model_validation(
        &self,
        user_id: &str,
        model_type: ModelType,
    ) -> Result<ModelValidation> {
        let today = Utc::now().date_naive();
        match self.db.latest_model_metrics(user_id, model_type)? {
            Some(metrics) => Ok(ModelValidation {
                model_type,
                metrics: MetricsSummary {
                    accuracy: metrics.accuracy,
                    mean_absolute_error: metrics.mean_absolute_error,
                    mean_squared_error: metrics.mean_squared_error,
                    root_mean_squared_error: metrics.root_mean_squared_error,
                },
                validation_period: ValidationPeriod {
                    start_date: metrics.validation_start_date,
                    end_date: metrics.validation_end_date,
                },
            }),
            None => Ok(ModelValidation {
                model_type,
                metrics: MetricsSummary {
                    accuracy: 0.0,
                    mean_absolute_error: 0.0,
                    mean_squared_error: 0.0,
                    root_mean_squared_error: 0.0,
                },
                validation_period: ValidationPeriod {
                    start_date: today,
                    end_date: today,
                },
            }),
        }
    }

    /// Run a fresh k-fold cross-validation and persist the metrics
    pub async fn validate_model(
        &self,
        user_id: &str,
        config: &PredictionConfig,
        k: usize,
    ) -> Result<ModelValidation> {
        config.validate()?;

        let transactions = self
            .history
            .historical_transactions(user_id, config.include_pending_transactions)
            .await
            .map_err(|e| Error::Upstream(format!("transaction history: {e}")))?;

        let recurring = if config.include_recurring_transactions {
            self.db.list_active_recurring(user_id)?
        } else {
            Vec::new()
        };

        let metrics = cross_validate(&transactions, &recurring, config, k)?;

        let start_date = transactions
            .iter()
            .map(|t| t.date)
            .min()
            .unwrap_or_else(|| Utc::now().date_naive());
        let end_date = transactions
            .iter()
            .map(|t| t.date)
            .max()
            .unwrap_or(start_date);

        self.db.insert_model_metrics(
            user_id,
            config.model_type,
            &metrics,
            start_date,
            end_date,
        )?;
        info!(
            user_id,
            model = %config.model_type,
            folds = k,
            accuracy = metrics.accuracy,
            mae = metrics.mean_absolute_error,
            "Model validation complete"
        );

        Ok(ModelValidation {
            model_type: config.model_type,
            metrics: MetricsSummary {
                accuracy: metrics.accuracy,
                mean_absolute_error: metrics.mean_absolute_error,
                mean_squared_error: metrics.mean_squared_error,
                root_mean_squared_error: metrics.root_mean_squared_error,
            },
            validation_period: ValidationPeriod {
                start_date,
                end_date,
            },
        })
    }

    /// Access the underlying database
    pub fn db(&self) -> &Database {
        &self.db
    }
}
