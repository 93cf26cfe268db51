//! Domain models for flowcast

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// How often a recurring transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "biweekly" | "bi-weekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annual" | "yearly" => Ok(Self::Annual),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecasting model used to produce a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelType {
    TimeSeries,
    RecurringTransaction,
    Hybrid,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeSeries => "time-series",
            Self::RecurringTransaction => "recurring-transaction",
            Self::Hybrid => "hybrid",
        }
    }
}

impl std::str::FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time-series" | "time_series" | "timeseries" => Ok(Self::TimeSeries),
            "recurring-transaction" | "recurring_transaction" | "recurring" => {
                Ok(Self::RecurringTransaction)
            }
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!("Unknown model type: {}", s)),
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Granularity of a persisted prediction row
///
/// The pipeline persists daily rows only; weekly/monthly views are
/// aggregated on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown timeframe: {}", s)),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalogued recurring transaction
///
/// Rows are written by an external detection job (or the CLI); the
/// forecasting pipeline only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: i64,
    pub user_id: String,
    pub merchant_name: String,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub frequency: Frequency,
    /// Preferred day of month for monthly schedules; falls back to
    /// `last_date.day()` when unset
    pub day_of_month: Option<u32>,
    /// Date of the most recent observed occurrence
    pub last_date: NaiveDate,
    pub next_predicted_date: NaiveDate,
    pub category: Option<String>,
    /// Detection confidence in [0, 1]
    pub confidence: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A new recurring transaction to be catalogued (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewRecurringTransaction {
    pub user_id: String,
    pub merchant_name: String,
    pub amount: f64,
    pub frequency: Frequency,
    pub day_of_month: Option<u32>,
    pub last_date: NaiveDate,
    pub category: Option<String>,
    pub confidence: f64,
}

/// A historical transaction from the upstream history provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: NaiveDate,
    /// Negative = expense, positive = income
    pub amount: f64,
    pub category: Option<String>,
    pub merchant_name: Option<String>,
    /// Not yet posted; filtered out when the config excludes pending rows
    #[serde(default)]
    pub pending: bool,
}

/// An account balance from the upstream balance provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub account_id: String,
    pub name: String,
    pub balance: f64,
}

/// One day of net cash flow history
///
/// Days with no transactions carry an explicit zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One day of the time-series model's forward projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesEstimate {
    pub date: NaiveDate,
    pub value: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
}

/// A recurring transaction projected onto a specific future day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringPrediction {
    pub date: NaiveDate,
    pub amount: f64,
    pub merchant_name: String,
    pub category: Option<String>,
    pub confidence: f64,
    pub is_income: bool,
}

/// Combined forecast for one day of the horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPrediction {
    pub date: NaiveDate,
    pub value: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
    pub recurring_transactions: Vec<RecurringPrediction>,
}

/// A consecutive 7-day rollup (the final run may be shorter)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPrediction {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cash_flow: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
}

/// A calendar-month rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPrediction {
    /// "January 2026" style label
    pub month: String,
    pub cash_flow: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
}

/// Whole-horizon rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPrediction {
    pub cash_flow: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
}

/// Risk condition detected while scanning the forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertType {
    NegativeBalance,
    LargeExpense,
    UnusualActivity,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NegativeBalance => "negative-balance",
            Self::LargeExpense => "large-expense",
            Self::UnusualActivity => "unusual-activity",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Numeric priority for sorting (higher = more severe)
    pub fn priority(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A risk alert generated from the forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_transactions: Option<Vec<RecurringPrediction>>,
}

/// Configuration for a prediction run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionConfig {
    pub model_type: ModelType,
    /// Forecast horizon in days
    pub timeframe_in_days: i64,
    /// Include pending transactions in the history fetch
    pub include_pending_transactions: bool,
    /// Include the recurring catalogue in the forecast
    pub include_recurring_transactions: bool,
    /// Confidence level for intervals, exclusive (0, 1)
    pub confidence_level: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            model_type: ModelType::Hybrid,
            timeframe_in_days: 90,
            include_pending_transactions: true,
            include_recurring_transactions: true,
            confidence_level: 0.95,
        }
    }
}

impl PredictionConfig {
    /// Validate configuration before any data is fetched
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.timeframe_in_days <= 0 {
            return Err(crate::error::Error::InvalidConfig(format!(
                "timeframe_in_days must be positive, got {}",
                self.timeframe_in_days
            )));
        }
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(crate::error::Error::InvalidConfig(format!(
                "confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

/// Full result of a prediction run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub daily_predictions: Vec<DailyPrediction>,
    pub weekly_predictions: Vec<WeeklyPrediction>,
    pub monthly_predictions: Vec<MonthlyPrediction>,
    pub total_prediction: TotalPrediction,
    pub alerts: Vec<Alert>,
}

/// A persisted prediction row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowPrediction {
    pub id: i64,
    pub user_id: String,
    pub prediction_date: NaiveDate,
    pub amount: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
    pub model_type: ModelType,
    pub timeframe: Timeframe,
    pub created_at: DateTime<Utc>,
}

/// A new prediction row to be persisted (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub prediction_date: NaiveDate,
    pub amount: f64,
    pub confidence_low: f64,
    pub confidence_high: f64,
    pub model_type: ModelType,
    pub timeframe: Timeframe,
}

/// A persisted model validation metrics row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub id: i64,
    pub user_id: String,
    pub model_type: ModelType,
    pub accuracy: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    pub validation_start_date: NaiveDate,
    pub validation_end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Transient output of a cross-validation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMetrics {
    /// `(1 - MAE / max abs error) * 100`, 100 when the max error is zero
    pub accuracy: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
    /// Percentage of days where predicted and actual share sign
    pub direction_accuracy: f64,
    /// Correlation-style score floored at zero, as a percentage
    pub r2_score: f64,
}

impl ValidationMetrics {
    pub fn zeroed() -> Self {
        Self {
            accuracy: 0.0,
            mean_absolute_error: 0.0,
            mean_squared_error: 0.0,
            root_mean_squared_error: 0.0,
            direction_accuracy: 0.0,
            r2_score: 0.0,
        }
    }
}

/// The reduced metric set reported to callers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub accuracy: f64,
    pub mean_absolute_error: f64,
    pub mean_squared_error: f64,
    pub root_mean_squared_error: f64,
}

/// Date range a validation run covered
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Validation report for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelValidation {
    pub model_type: ModelType,
    pub metrics: MetricsSummary,
    pub validation_period: ValidationPeriod,
}

/// Cross-user average metrics over the trailing 30 days
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageMetrics {
    pub avg_accuracy: f64,
    pub avg_mean_absolute_error: f64,
    pub avg_mean_squared_error: f64,
    pub avg_root_mean_squared_error: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_type_round_trip() {
        for m in [
            ModelType::TimeSeries,
            ModelType::RecurringTransaction,
            ModelType::Hybrid,
        ] {
            let parsed: ModelType = m.as_str().parse().unwrap();
            assert_eq!(parsed, m);
        }
        assert_eq!(ModelType::TimeSeries.as_str(), "time-series");
        assert_eq!(
            ModelType::RecurringTransaction.as_str(),
            "recurring-transaction"
        );
    }

    #[test]
    fn test_frequency_parse_aliases() {
        assert_eq!("bi-weekly".parse::<Frequency>().unwrap(), Frequency::Biweekly);
        assert_eq!("yearly".parse::<Frequency>().unwrap(), Frequency::Annual);
        assert!("fortnightly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = PredictionConfig::default();
        assert_eq!(config.model_type, ModelType::Hybrid);
        assert_eq!(config.timeframe_in_days, 90);
        assert!(config.include_pending_transactions);
        assert!(config.include_recurring_transactions);
        assert!((config.confidence_level - 0.95).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let mut config = PredictionConfig {
            timeframe_in_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.timeframe_in_days = 30;
        config.confidence_level = 1.0;
        assert!(config.validate().is_err());

        config.confidence_level = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_severity_priority_ordering() {
        assert!(AlertSeverity::High.priority() > AlertSeverity::Medium.priority());
        assert!(AlertSeverity::Medium.priority() > AlertSeverity::Low.priority());
    }
}
