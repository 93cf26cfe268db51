//! Flowcast Core Library
//!
//! Shared functionality for the Flowcast cash flow forecasting tool:
//! - Database access and migrations (recurring catalogue, predictions, metrics)
//! - Pluggable transaction history and balance providers
//! - Moving-average, recurring-schedule, and hybrid forecast models
//! - Weekly/monthly/total rollups and risk alert generation
//! - K-fold walk-forward model validation
//! - Orchestrating prediction service

pub mod db;
pub mod error;
pub mod forecast;
pub mod models;
pub mod providers;
pub mod service;
pub mod validation;

pub use db::Database;
pub use error::{Error, Result};
pub use forecast::{build_daily_series, run_model, MovingAverageForecaster};
pub use models::{
    AccountBalance, Alert, AlertSeverity, AlertType, AverageMetrics, CashFlowPrediction,
    DailyPrediction, Frequency, MetricsSummary, ModelMetrics, ModelType, ModelValidation,
    MonthlyPrediction, NewPrediction, NewRecurringTransaction, PredictionConfig, PredictionResult,
    RecurringPrediction, RecurringTransaction, Timeframe, TotalPrediction, Transaction,
    ValidationMetrics, ValidationPeriod, WeeklyPrediction,
};
pub use providers::{AccountBalances, CsvHistory, StaticBalances, StaticHistory, TransactionHistory};
pub use service::PredictionService;
pub use validation::cross_validate;
