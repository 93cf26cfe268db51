//! Model validation and metrics commands

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use flowcast_core::{
    CsvHistory, Database, PredictionConfig, PredictionService, StaticBalances,
};

use super::{open_db, parse_model};

pub async fn cmd_validate(
    db_path: &Path,
    user: &str,
    history: &Path,
    model: &str,
    folds: usize,
    no_encrypt: bool,
) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    let config = PredictionConfig {
        model_type: parse_model(model)?,
        ..Default::default()
    };

    let service = PredictionService::new(
        db,
        Arc::new(CsvHistory::new(history)),
        Arc::new(StaticBalances::from_amounts(&[])),
    );

    println!("🔍 Validating {} model ({} folds)...", model, folds);
    let validation = service
        .validate_model(user, &config, folds)
        .await
        .context("Validation failed")?;

    println!();
    println!("📊 Validation Results");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Period:   {} → {}",
        validation.validation_period.start_date, validation.validation_period.end_date
    );
    println!("   Accuracy: {:.1}%", validation.metrics.accuracy);
    println!("   MAE:      ${:.2}", validation.metrics.mean_absolute_error);
    println!("   MSE:      {:.2}", validation.metrics.mean_squared_error);
    println!(
        "   RMSE:     ${:.2}",
        validation.metrics.root_mean_squared_error
    );

    Ok(())
}

pub fn cmd_metrics(
    db: &Database,
    user: &str,
    model: &str,
    history_limit: i64,
    average: bool,
) -> Result<()> {
    let model_type = parse_model(model)?;

    if average {
        let avg = db.average_model_metrics(model_type)?;
        println!();
        println!("📊 Cross-user averages, trailing 30 days ({})", model);
        println!("   Accuracy: {:.1}%", avg.avg_accuracy);
        println!("   MAE:      ${:.2}", avg.avg_mean_absolute_error);
        println!("   MSE:      {:.2}", avg.avg_mean_squared_error);
        println!("   RMSE:     ${:.2}", avg.avg_root_mean_squared_error);
        return Ok(());
    }

    let history = db.model_metrics_history(user, model_type, history_limit)?;
    if history.is_empty() {
        println!("No validation runs recorded for the {} model. Run:", model);
        println!("  flowcast validate -f history.csv --model {}", model);
        return Ok(());
    }

    println!();
    println!("📊 Validation History ({})", model);
    println!("   ─────────────────────────────────────────────────────────────");
    for m in history {
        println!(
            "   {} │ accuracy {:>5.1}% │ MAE {:>8} │ {} → {}",
            m.created_at.format("%Y-%m-%d %H:%M"),
            m.accuracy,
            format!("${:.2}", m.mean_absolute_error),
            m.validation_start_date,
            m.validation_end_date
        );
    }

    Ok(())
}
