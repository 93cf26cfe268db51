//! Forecast generation command

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use flowcast_core::{
    CsvHistory, PredictionConfig, PredictionResult, PredictionService, StaticBalances,
};

use super::{open_db, parse_model};

#[allow(clippy::too_many_arguments)]
pub async fn cmd_predict(
    db_path: &Path,
    user: &str,
    history: &Path,
    balances: &[f64],
    model: &str,
    days: i64,
    confidence: f64,
    no_recurring: bool,
    exclude_pending: bool,
    json: bool,
    no_encrypt: bool,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let config = PredictionConfig {
        model_type: parse_model(model)?,
        timeframe_in_days: days,
        include_pending_transactions: !exclude_pending,
        include_recurring_transactions: !no_recurring,
        confidence_level: confidence,
    };

    let service = PredictionService::new(
        db,
        Arc::new(CsvHistory::new(history)),
        Arc::new(StaticBalances::from_amounts(balances)),
    );

    let result = service
        .generate_predictions(user, &config)
        .await
        .context("Prediction failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_summary(&result, days);
    Ok(())
}

fn print_summary(result: &PredictionResult, days: i64) {
    println!();
    println!("📈 Cash Flow Forecast ({} days)", days);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Total: ${:.2}  (range ${:.2} to ${:.2})",
        result.total_prediction.cash_flow,
        result.total_prediction.confidence_low,
        result.total_prediction.confidence_high
    );

    println!();
    println!("   By week:");
    for week in &result.weekly_predictions {
        println!(
            "   {} → {} │ {:>10}",
            week.start_date,
            week.end_date,
            format!("${:.2}", week.cash_flow)
        );
    }

    println!();
    println!("   By month:");
    for month in &result.monthly_predictions {
        println!(
            "   {:20} │ {:>10}",
            month.month,
            format!("${:.2}", month.cash_flow)
        );
    }

    if result.alerts.is_empty() {
        println!();
        println!("✅ No risk alerts");
    } else {
        println!();
        println!("⚠️  Alerts ({})", result.alerts.len());
        for alert in &result.alerts {
            let icon = match alert.severity {
                flowcast_core::AlertSeverity::High => "🔴",
                flowcast_core::AlertSeverity::Medium => "🟡",
                flowcast_core::AlertSeverity::Low => "🔵",
            };
            println!("   {} {} │ {}", icon, alert.date, alert.message);
        }
    }
}
