//! Hybrid model combiner
//!
//! Blends the time-series baseline with projected recurring transactions.
//! Days with a known recurring event lean on the recurring amount; quiet
//! days lean on the time-series trend.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{DailyPrediction, RecurringPrediction, TimeSeriesEstimate};

/// Blend weights for one day of the hybrid forecast
#[derive(Debug, Clone, Copy)]
pub struct ModelWeights {
    pub time_series: f64,
    pub recurring: f64,
    /// Interval scaling: recurring-dominated days get tighter intervals
    pub confidence_adjustment: f64,
}

impl ModelWeights {
    /// Weights for a day, depending on whether a recurring event lands on it
    pub fn for_day(has_recurring: bool) -> Self {
        if has_recurring {
            Self {
                time_series: 0.3,
                recurring: 0.7,
                confidence_adjustment: 0.6,
            }
        } else {
            Self {
                time_series: 0.8,
                recurring: 0.2,
                confidence_adjustment: 1.0,
            }
        }
    }
}

/// Combine one day's time-series estimate with its recurring events.
///
/// The interval offsets of the time-series estimate are re-anchored around
/// the combined value and scaled by the confidence adjustment, so
/// `confidence_low <= value <= confidence_high` always holds.
fn combine_day(
    estimate: &TimeSeriesEstimate,
    recurring: Vec<RecurringPrediction>,
) -> DailyPrediction {
    let weights = ModelWeights::for_day(!recurring.is_empty());
    let recurring_sum: f64 = recurring.iter().map(|r| r.amount).sum();

    let value = estimate.value * weights.time_series + recurring_sum * weights.recurring;
    let low_offset = (estimate.value - estimate.confidence_low) * weights.confidence_adjustment;
    let high_offset = (estimate.confidence_high - estimate.value) * weights.confidence_adjustment;

    DailyPrediction {
        date: estimate.date,
        value,
        confidence_low: value - low_offset,
        confidence_high: value + high_offset,
        recurring_transactions: recurring,
    }
}

/// Combine a horizon of estimates with recurring events grouped by day
pub fn combine(
    estimates: &[TimeSeriesEstimate],
    mut recurring_by_day: BTreeMap<NaiveDate, Vec<RecurringPrediction>>,
) -> Vec<DailyPrediction> {
    estimates
        .iter()
        .map(|est| combine_day(est, recurring_by_day.remove(&est.date).unwrap_or_default()))
        .collect()
}
