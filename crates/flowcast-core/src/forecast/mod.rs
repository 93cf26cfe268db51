//! Forecasting models and rollups
//!
//! - `series` - daily net cash flow series construction
//! - `time_series` - moving-average baseline model
//! - `recurring` - recurring transaction schedule projection
//! - `combine` - hybrid blend of the two models
//! - `aggregate` - weekly/monthly/total rollups
//! - `alerts` - risk alert generation

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::error::Result;
use crate::models::{DailyPrediction, ModelType, RecurringTransaction, TimeSeriesPoint};

pub mod aggregate;
pub mod alerts;
pub mod combine;
pub mod recurring;
pub mod series;
pub mod time_series;

pub use series::build_daily_series;
pub use time_series::MovingAverageForecaster;

/// Run the selected model over a horizon of `days` starting at `start`.
///
/// - Time-series: the moving-average projection alone, no recurring events.
/// - Recurring-transaction: the per-day sum of scheduled events, with a
///   degenerate interval (the schedule is deterministic).
/// - Hybrid: both, blended per day.
pub fn run_model(
    model_type: ModelType,
    series: &[TimeSeriesPoint],
    recurring: &[RecurringTransaction],
    start: NaiveDate,
    days: i64,
    confidence_level: f64,
) -> Result<Vec<DailyPrediction>> {
    match model_type {
        ModelType::TimeSeries => {
            let forecaster = MovingAverageForecaster::new(confidence_level);
            let estimates = forecaster.forecast(series, start, days)?;
            Ok(estimates
                .iter()
                .map(|est| DailyPrediction {
                    date: est.date,
                    value: est.value,
                    confidence_low: est.confidence_low,
                    confidence_high: est.confidence_high,
                    recurring_transactions: vec![],
                })
                .collect())
        }
        ModelType::RecurringTransaction => Ok((0..days)
            .map(|offset| {
                let date = start + Duration::days(offset);
                let events = recurring::predictions_for(date, recurring);
                let value: f64 = events.iter().map(|e| e.amount).sum();
                DailyPrediction {
                    date,
                    value,
                    confidence_low: value,
                    confidence_high: value,
                    recurring_transactions: events,
                }
            })
            .collect()),
        ModelType::Hybrid => {
            let forecaster = MovingAverageForecaster::new(confidence_level);
            let estimates = forecaster.forecast(series, start, days)?;

            let mut by_day = BTreeMap::new();
            for est in &estimates {
                let events = recurring::predictions_for(est.date, recurring);
                if !events.is_empty() {
                    by_day.insert(est.date, events);
                }
            }

            Ok(combine::combine(&estimates, by_day))
        }
    }
}
