//! Stored prediction inspection and pruning commands

use anyhow::Result;
use flowcast_core::{CashFlowPrediction, Database, Timeframe};

use super::{parse_date_arg, parse_model};

fn print_rows(rows: &[CashFlowPrediction]) {
    println!();
    println!("📈 Stored Predictions");
    println!("   ─────────────────────────────────────────────────────────────");
    for row in rows {
        println!(
            "   {} │ {:>10} │ range {:>10} to {:>10} │ {}",
            row.prediction_date,
            format!("${:.2}", row.amount),
            format!("${:.2}", row.confidence_low),
            format!("${:.2}", row.confidence_high),
            row.model_type.as_str()
        );
    }
}

pub fn cmd_predictions_list(db: &Database, user: &str, from: &str, to: &str) -> Result<()> {
    let start = parse_date_arg(from, "--from")?;
    let end = parse_date_arg(to, "--to")?;

    let rows = db.predictions_between(user, start, end, Timeframe::Daily)?;
    if rows.is_empty() {
        println!("No stored predictions between {} and {}.", start, end);
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

pub fn cmd_predictions_latest(db: &Database, user: &str, model: &str, limit: i64) -> Result<()> {
    let model_type = parse_model(model)?;

    let rows = db.latest_predictions(user, model_type, Timeframe::Daily, limit)?;
    if rows.is_empty() {
        println!("No upcoming predictions stored for the {} model. Run:", model);
        println!("  flowcast predict -f history.csv --model {}", model);
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

pub fn cmd_predictions_prune(db: &Database, user: &str, before: &str) -> Result<()> {
    let cutoff = parse_date_arg(before, "--before")?;
    let removed = db.delete_predictions_before(user, cutoff)?;
    println!("✅ Removed {} prediction(s) dated before {}", removed, cutoff);
    Ok(())
}
