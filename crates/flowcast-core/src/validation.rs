//! K-fold walk-forward cross-validation
//!
//! Splits the transaction history into k consecutive windows, re-runs the
//! model over each window's date span, and scores the predictions against
//! the actual daily net cash flow. Window metrics are averaged unweighted.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Error, Result};
use crate::forecast::{self, build_daily_series};
use crate::models::{PredictionConfig, RecurringTransaction, Transaction, ValidationMetrics};

/// Split a sorted list of n transactions into k equal windows.
///
/// The window length is `n / k` rounded down; trailing transactions beyond
/// `k * window` are left out of the evaluation.
pub(crate) fn window_bounds(n: usize, k: usize) -> Vec<(usize, usize)> {
    let window = n / k;
    (0..k)
        .map(|i| (i * window, (i + 1) * window))
        .collect()
}

/// Cross-validate a model over the user's transaction history.
///
/// Windows are consecutive slices of the date-sorted transaction list.
/// Returns the metrics averaged across all k windows. Fails with
/// `InsufficientHistory` when the history cannot fill even one-transaction
/// windows.
pub fn cross_validate(
    transactions: &[Transaction],
    recurring: &[RecurringTransaction],
    config: &PredictionConfig,
    k: usize,
) -> Result<ValidationMetrics> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let n = sorted.len();
    if k == 0 || n / k == 0 {
        return Err(Error::InsufficientHistory {
            required: k.max(1),
            available: n,
        });
    }

    let series = build_daily_series(transactions);

    let mut sums = ValidationMetrics::zeroed();
    let bounds = window_bounds(n, k);
    let k = bounds.len();

    for (i, &(start_idx, end_idx)) in bounds.iter().enumerate() {
        let window = &sorted[start_idx..end_idx];
        let start = window[0].date;
        let end = window[window.len() - 1].date;
        let days = (end - start).num_days() + 1;

        let predicted = forecast::run_model(
            config.model_type,
            &series,
            recurring,
            start,
            days,
            config.confidence_level,
        )?;

        let mut actuals: HashMap<NaiveDate, f64> = HashMap::new();
        for tx in window {
            *actuals.entry(tx.date).or_insert(0.0) += tx.amount;
        }
        let metrics = score_window(&predicted, &actuals);

        debug!(
            window = i + 1,
            windows = k,
            %start,
            %end,
            mae = metrics.mean_absolute_error,
            accuracy = metrics.accuracy,
            "Scored validation window"
        );

        sums.accuracy += metrics.accuracy;
        sums.mean_absolute_error += metrics.mean_absolute_error;
        sums.mean_squared_error += metrics.mean_squared_error;
        sums.root_mean_squared_error += metrics.root_mean_squared_error;
        sums.direction_accuracy += metrics.direction_accuracy;
        sums.r2_score += metrics.r2_score;
    }

    let k = k as f64;
    Ok(ValidationMetrics {
        accuracy: sums.accuracy / k,
        mean_absolute_error: sums.mean_absolute_error / k,
        mean_squared_error: sums.mean_squared_error / k,
        root_mean_squared_error: sums.root_mean_squared_error / k,
        direction_accuracy: sums.direction_accuracy / k,
        r2_score: sums.r2_score / k,
    })
}

/// Score one window of predictions against actual daily values.
///
/// Days with no recorded activity count as zero actuals.
fn score_window(
    predicted: &[crate::models::DailyPrediction],
    actuals: &HashMap<NaiveDate, f64>,
) -> ValidationMetrics {
    let n = predicted.len();
    if n == 0 {
        return ValidationMetrics::zeroed();
    }

    let pairs: Vec<(f64, f64)> = predicted
        .iter()
        .map(|p| (actuals.get(&p.date).copied().unwrap_or(0.0), p.value))
        .collect();

    let n_f = n as f64;
    let mae = pairs.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n_f;
    let mse = pairs.iter().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / n_f;
    let rmse = mse.sqrt();

    let same_direction = pairs
        .iter()
        .filter(|(a, p)| (*a >= 0.0) == (*p >= 0.0))
        .count();
    let direction_accuracy = same_direction as f64 / n_f * 100.0;

    let max_abs = pairs
        .iter()
        .map(|(a, p)| (a - p).abs())
        .fold(0.0_f64, f64::max);
    let accuracy = if max_abs == 0.0 {
        100.0
    } else {
        ((1.0 - mae / max_abs) * 100.0).max(0.0)
    };

    ValidationMetrics {
        accuracy,
        mean_absolute_error: mae,
        mean_squared_error: mse,
        root_mean_squared_error: rmse,
        direction_accuracy,
        r2_score: r2_score(&pairs, mse),
    }
}

/// Pearson-correlation-style score floored at zero, as a percentage.
///
/// A perfect fit with zero variance in either side (zero denominator)
/// scores 100 only when the squared error is also zero.
fn r2_score(pairs: &[(f64, f64)], mse: f64) -> f64 {
    let n = pairs.len() as f64;
    let sum_a: f64 = pairs.iter().map(|(a, _)| a).sum();
    let sum_p: f64 = pairs.iter().map(|(_, p)| p).sum();
    let sum_ap: f64 = pairs.iter().map(|(a, p)| a * p).sum();
    let sum_a2: f64 = pairs.iter().map(|(a, _)| a * a).sum();
    let sum_p2: f64 = pairs.iter().map(|(_, p)| p * p).sum();

    let denom = ((n * sum_a2 - sum_a * sum_a) * (n * sum_p2 - sum_p * sum_p)).sqrt();
    if denom == 0.0 {
        return if mse == 0.0 { 100.0 } else { 0.0 };
    }

    let r = (n * sum_ap - sum_a * sum_p) / denom;
    (r * 100.0).max(0.0)
}
