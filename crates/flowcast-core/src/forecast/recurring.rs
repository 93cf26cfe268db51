//! Recurring transaction projection
//!
//! Deterministic schedule rules: given a catalogued recurring transaction,
//! decide whether it lands on a given future day and find its next
//! occurrence. Monthly-style frequencies clamp the scheduled day to the
//! length of short months (the 31st lands on Feb 28/29).

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Frequency, RecurringPrediction, RecurringTransaction};

/// Number of days in the month containing `date`
fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // First of next month minus one day is always valid
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Scheduled day clamped to the month containing `date`
fn clamped_day(scheduled_day: u32, date: NaiveDate) -> u32 {
    scheduled_day.min(days_in_month(date))
}

/// Whether a schedule with the given rule lands on `date`.
///
/// `last_date` anchors weekday- and interval-based frequencies;
/// `day_of_month` (falling back to the day of `last_date`) anchors the
/// calendar-based ones.
pub fn occurs_on(
    frequency: Frequency,
    day_of_month: Option<u32>,
    last_date: NaiveDate,
    date: NaiveDate,
) -> bool {
    match frequency {
        Frequency::Weekly => date.weekday() == last_date.weekday(),
        Frequency::Biweekly => {
            let delta = (date - last_date).num_days();
            delta >= 0 && delta % 14 == 0
        }
        Frequency::Monthly => {
            let scheduled = day_of_month.unwrap_or(last_date.day());
            date.day() == clamped_day(scheduled, date)
        }
        Frequency::Quarterly => {
            let months = (date.year() - last_date.year()) * 12 + date.month() as i32
                - last_date.month() as i32;
            months % 3 == 0 && date.day() == clamped_day(last_date.day(), date)
        }
        Frequency::Annual => {
            date.month() == last_date.month() && date.day() == clamped_day(last_date.day(), date)
        }
    }
}

/// Whether an active catalogued transaction should occur on `date`
pub fn should_occur_on(tx: &RecurringTransaction, date: NaiveDate) -> bool {
    tx.is_active && occurs_on(tx.frequency, tx.day_of_month, tx.last_date, date)
}

/// Project every catalogued transaction that lands on `date`
pub fn predictions_for(
    date: NaiveDate,
    recurring: &[RecurringTransaction],
) -> Vec<RecurringPrediction> {
    recurring
        .iter()
        .filter(|tx| should_occur_on(tx, date))
        .map(|tx| RecurringPrediction {
            date,
            amount: tx.amount,
            merchant_name: tx.merchant_name.clone(),
            category: tx.category.clone(),
            confidence: tx.confidence,
            is_income: tx.amount > 0.0,
        })
        .collect()
}

/// First occurrence strictly after `after`.
///
/// Scans day by day; 396 days covers the longest gap an annual schedule
/// with month-end clamping can produce.
pub fn next_occurrence(
    frequency: Frequency,
    day_of_month: Option<u32>,
    last_date: NaiveDate,
    after: NaiveDate,
) -> Option<NaiveDate> {
    (1..=396)
        .map(|offset| after + Duration::days(offset))
        .find(|&date| occurs_on(frequency, day_of_month, last_date, date))
}
