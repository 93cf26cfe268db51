//! Daily net cash flow series construction

use std::collections::BTreeMap;

use chrono::Duration;

use crate::models::{TimeSeriesPoint, Transaction};

/// Build a dense daily net cash flow series from raw transactions.
///
/// Transactions on the same day are summed. Days between the first and last
/// transaction with no activity carry an explicit zero, so downstream models
/// see a gapless series. Empty input produces an empty series.
pub fn build_daily_series(transactions: &[Transaction]) -> Vec<TimeSeriesPoint> {
    let mut by_day: BTreeMap<chrono::NaiveDate, f64> = BTreeMap::new();
    for tx in transactions {
        *by_day.entry(tx.date).or_insert(0.0) += tx.amount;
    }

    let (first, last) = match (by_day.keys().next(), by_day.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Vec::new(),
    };

    let mut series = Vec::with_capacity((last - first).num_days() as usize + 1);
    let mut date = first;
    while date <= last {
        series.push(TimeSeriesPoint {
            date,
            value: by_day.get(&date).copied().unwrap_or(0.0),
        });
        date += Duration::days(1);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(date: NaiveDate, amount: f64) -> Transaction {
        Transaction {
            date,
            amount,
            category: None,
            merchant_name: None,
            pending: false,
        }
    }

    #[test]
    fn test_same_day_amounts_are_summed() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let series = build_daily_series(&[tx(day, -20.0), tx(day, -30.0), tx(day, 100.0)]);

        assert_eq!(series.len(), 1);
        assert!((series[0].value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaps_are_zero_filled() {
        let first = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let series = build_daily_series(&[tx(last, -10.0), tx(first, 25.0)]);

        assert_eq!(series.len(), 5);
        assert_eq!(series[0].date, first);
        assert!((series[0].value - 25.0).abs() < 1e-9);
        for point in &series[1..4] {
            assert_eq!(point.value, 0.0);
        }
        assert!((series[4].value + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_daily_series(&[]).is_empty());
    }
}
