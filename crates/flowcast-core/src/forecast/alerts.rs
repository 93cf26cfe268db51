//! Risk alert generation
//!
//! Scans the daily forecast once, tracking a running balance from the
//! opening balance, and emits alerts for projected negative balances,
//! large recurring expenses, and days that fall well outside their own
//! confidence interval.

use crate::models::{Alert, AlertSeverity, AlertType, DailyPrediction};

/// Running balance below this is a high-severity alert
const NEGATIVE_BALANCE_HIGH: f64 = -500.0;
/// Running balance below this is a medium-severity alert
const NEGATIVE_BALANCE_MEDIUM: f64 = -100.0;
/// Recurring expenses at or below this amount count as large
const LARGE_EXPENSE_THRESHOLD: f64 = -200.0;

/// Generate risk alerts for a daily forecast, starting from `opening_balance`
pub fn generate_alerts(daily: &[DailyPrediction], opening_balance: f64) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let mut balance = opening_balance;

    for day in daily {
        balance += day.value;

        if balance < 0.0 {
            let severity = if balance < NEGATIVE_BALANCE_HIGH {
                AlertSeverity::High
            } else if balance < NEGATIVE_BALANCE_MEDIUM {
                AlertSeverity::Medium
            } else {
                AlertSeverity::Low
            };
            alerts.push(Alert {
                date: day.date,
                alert_type: AlertType::NegativeBalance,
                severity,
                message: format!("Projected negative balance of ${:.2}", balance),
                related_transactions: None,
            });
        }

        let large_expenses: Vec<_> = day
            .recurring_transactions
            .iter()
            .filter(|r| r.amount < LARGE_EXPENSE_THRESHOLD)
            .cloned()
            .collect();
        if !large_expenses.is_empty() {
            let total: f64 = large_expenses.iter().map(|r| r.amount.abs()).sum();
            alerts.push(Alert {
                date: day.date,
                alert_type: AlertType::LargeExpense,
                severity: AlertSeverity::Medium,
                message: format!(
                    "{} large expense(s) totaling ${:.2}",
                    large_expenses.len(),
                    total
                ),
                related_transactions: Some(large_expenses),
            });
        }

        // A day far outside its own interval suggests the models disagree
        let unusual = day.value != 0.0
            && (day.value < day.confidence_low * 0.5 || day.value > day.confidence_high * 1.5);
        if unusual {
            alerts.push(Alert {
                date: day.date,
                alert_type: AlertType::UnusualActivity,
                severity: AlertSeverity::Low,
                message: format!(
                    "Predicted cash flow of ${:.2} is outside the expected range",
                    day.value
                ),
                related_transactions: None,
            });
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecurringPrediction;
    use chrono::{Duration, NaiveDate};

    fn day(date: NaiveDate, value: f64, low: f64, high: f64) -> DailyPrediction {
        DailyPrediction {
            date,
            value,
            confidence_low: low,
            confidence_high: high,
            recurring_transactions: vec![],
        }
    }

    fn of_type(alerts: &[Alert], alert_type: AlertType) -> Vec<&Alert> {
        alerts.iter().filter(|a| a.alert_type == alert_type).collect()
    }

    #[test]
    fn test_negative_balance_severity_tiers() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let daily = vec![
            day(start, -150.0, -200.0, -100.0),                      // balance -50: low
            day(start + Duration::days(1), -100.0, -150.0, -50.0),   // balance -150: medium
            day(start + Duration::days(2), -400.0, -450.0, -350.0),  // balance -550: high
        ];

        let alerts = generate_alerts(&daily, 100.0);
        let negative = of_type(&alerts, AlertType::NegativeBalance);

        assert_eq!(negative.len(), 3);
        assert_eq!(negative[0].severity, AlertSeverity::Low);
        assert_eq!(negative[1].severity, AlertSeverity::Medium);
        assert_eq!(negative[2].severity, AlertSeverity::High);
        assert!(negative[2].message.contains("$-550.00"));
    }

    #[test]
    fn test_no_alert_while_balance_positive() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let daily = vec![day(start, -50.0, -80.0, -20.0)];
        let alerts = generate_alerts(&daily, 1000.0);
        assert!(of_type(&alerts, AlertType::NegativeBalance).is_empty());
    }

    #[test]
    fn test_large_expenses_are_grouped_per_day() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let mut forecast_day = day(start, -2100.0, -2200.0, -2000.0);
        forecast_day.recurring_transactions = vec![
            RecurringPrediction {
                date: start,
                amount: -1800.0,
                merchant_name: "RENT".to_string(),
                category: None,
                confidence: 0.9,
                is_income: false,
            },
            RecurringPrediction {
                date: start,
                amount: -300.0,
                merchant_name: "CAR PAYMENT".to_string(),
                category: None,
                confidence: 0.9,
                is_income: false,
            },
            RecurringPrediction {
                date: start,
                amount: -15.0,
                merchant_name: "SPOTIFY".to_string(),
                category: None,
                confidence: 0.9,
                is_income: false,
            },
        ];

        let alerts = generate_alerts(&[forecast_day], 10_000.0);
        let large = of_type(&alerts, AlertType::LargeExpense);

        assert_eq!(large.len(), 1);
        assert_eq!(large[0].severity, AlertSeverity::Medium);
        assert!(large[0].message.contains("2 large expense(s)"));
        assert!(large[0].message.contains("$2100.00"));
        assert_eq!(large[0].related_transactions.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_unusual_activity_outside_interval() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        // -160 < -400 * 0.5? no. Within interval: no alert.
        let normal = day(start, -160.0, -400.0, 0.0);
        // -300 < -400 * 0.5 = -200: alert.
        let unusual = day(start + Duration::days(1), -300.0, -400.0, 0.0);

        let alerts = generate_alerts(&[normal, unusual], 100_000.0);
        let flagged = of_type(&alerts, AlertType::UnusualActivity);

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].date, start + Duration::days(1));
        assert_eq!(flagged[0].severity, AlertSeverity::Low);
    }

    #[test]
    fn test_zero_days_are_never_unusual() {
        let start = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let daily = vec![day(start, 0.0, -1.0, 1.0)];
        let alerts = generate_alerts(&daily, 100_000.0);
        assert!(of_type(&alerts, AlertType::UnusualActivity).is_empty());
    }
}
