//! Weekly, monthly, and whole-horizon rollups of the daily forecast

use chrono::Datelike;

use crate::models::{DailyPrediction, MonthlyPrediction, TotalPrediction, WeeklyPrediction};

/// Roll daily predictions into consecutive 7-day chunks.
///
/// Chunks are anchored to the start of the horizon, not the calendar week;
/// the final chunk may be shorter.
pub fn aggregate_weekly(daily: &[DailyPrediction]) -> Vec<WeeklyPrediction> {
    daily
        .chunks(7)
        .map(|chunk| WeeklyPrediction {
            start_date: chunk[0].date,
            end_date: chunk[chunk.len() - 1].date,
            cash_flow: chunk.iter().map(|d| d.value).sum(),
            confidence_low: chunk.iter().map(|d| d.confidence_low).sum(),
            confidence_high: chunk.iter().map(|d| d.confidence_high).sum(),
        })
        .collect()
}

/// Roll daily predictions into calendar months, in horizon order.
///
/// Months at the edges of the horizon are partial.
pub fn aggregate_monthly(daily: &[DailyPrediction]) -> Vec<MonthlyPrediction> {
    let mut months: Vec<((i32, u32), MonthlyPrediction)> = Vec::new();

    for day in daily {
        let key = (day.date.year(), day.date.month());
        match months.last_mut() {
            Some((last_key, month)) if *last_key == key => {
                month.cash_flow += day.value;
                month.confidence_low += day.confidence_low;
                month.confidence_high += day.confidence_high;
            }
            _ => {
                months.push((
                    key,
                    MonthlyPrediction {
                        month: day.date.format("%B %Y").to_string(),
                        cash_flow: day.value,
                        confidence_low: day.confidence_low,
                        confidence_high: day.confidence_high,
                    },
                ));
            }
        }
    }

    months.into_iter().map(|(_, month)| month).collect()
}

/// Sum the entire horizon into one figure
pub fn total(daily: &[DailyPrediction]) -> TotalPrediction {
    TotalPrediction {
        cash_flow: daily.iter().map(|d| d.value).sum(),
        confidence_low: daily.iter().map(|d| d.confidence_low).sum(),
        confidence_high: daily.iter().map(|d| d.confidence_high).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn horizon(start: NaiveDate, days: i64, value: f64) -> Vec<DailyPrediction> {
        (0..days)
            .map(|i| DailyPrediction {
                date: start + Duration::days(i),
                value,
                confidence_low: value - 5.0,
                confidence_high: value + 5.0,
                recurring_transactions: vec![],
            })
            .collect()
    }

    #[test]
    fn test_weekly_chunks_with_short_tail() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let weeks = aggregate_weekly(&horizon(start, 17, 10.0));

        assert_eq!(weeks.len(), 3);
        assert_eq!(weeks[0].start_date, start);
        assert_eq!(weeks[0].end_date, start + Duration::days(6));
        assert!((weeks[0].cash_flow - 70.0).abs() < 1e-9);

        // Last chunk is 3 days
        assert_eq!(weeks[2].start_date, start + Duration::days(14));
        assert_eq!(weeks[2].end_date, start + Duration::days(16));
        assert!((weeks[2].cash_flow - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_groups_by_calendar_month() {
        // Jan 25 .. Feb 8 straddles the month boundary
        let start = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
        let months = aggregate_monthly(&horizon(start, 15, 10.0));

        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "January 2026");
        assert!((months[0].cash_flow - 70.0).abs() < 1e-9);
        assert_eq!(months[1].month, "February 2026");
        assert!((months[1].cash_flow - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_sums_equal_total() {
        // Uneven horizon so the short final chunk is part of the check
        let start = NaiveDate::from_ymd_opt(2026, 1, 25).unwrap();
        let daily: Vec<DailyPrediction> = (0..17)
            .map(|i| DailyPrediction {
                date: start + Duration::days(i),
                value: -7.5 + i as f64 * 3.0,
                confidence_low: -20.0 + i as f64,
                confidence_high: 5.0 + i as f64,
                recurring_transactions: vec![],
            })
            .collect();

        let weeks = aggregate_weekly(&daily);
        let t = total(&daily);

        let weekly_sum: f64 = weeks.iter().map(|w| w.cash_flow).sum();
        let weekly_low: f64 = weeks.iter().map(|w| w.confidence_low).sum();
        let weekly_high: f64 = weeks.iter().map(|w| w.confidence_high).sum();

        assert!((weekly_sum - t.cash_flow).abs() < 1e-9);
        assert!((weekly_low - t.confidence_low).abs() < 1e-9);
        assert!((weekly_high - t.confidence_high).abs() < 1e-9);
    }

    #[test]
    fn test_total_sums_everything() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let t = total(&horizon(start, 10, -3.0));
        assert!((t.cash_flow + 30.0).abs() < 1e-9);
        assert!((t.confidence_low + 80.0).abs() < 1e-9);
        assert!((t.confidence_high - 20.0).abs() < 1e-9);
    }
}
