//! Flowcast CLI - Cash flow forecaster
//!
//! Usage:
//!   flowcast init                       Initialize database
//!   flowcast predict -f history.csv     Generate a forecast
//!   flowcast validate -f history.csv    Cross-validate a model
//!   flowcast recurring list             Show the recurring catalogue

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Predict {
            history,
            balance,
            model,
            days,
            confidence,
            no_recurring,
            exclude_pending,
            json,
        } => {
            commands::cmd_predict(
                &cli.db,
                &cli.user,
                &history,
                &balance,
                &model,
                days,
                confidence,
                no_recurring,
                exclude_pending,
                json,
                cli.no_encrypt,
            )
            .await
        }
        Commands::Validate {
            history,
            model,
            folds,
        } => {
            commands::cmd_validate(
                &cli.db,
                &cli.user,
                &history,
                &model,
                folds,
                cli.no_encrypt,
            )
            .await
        }
        Commands::Metrics {
            model,
            history_limit,
            average,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_metrics(&db, &cli.user, &model, history_limit, average)
        }
        Commands::Recurring { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(RecurringAction::List { all: false }) => {
                    commands::cmd_recurring_list(&db, &cli.user, false)
                }
                Some(RecurringAction::List { all }) => {
                    commands::cmd_recurring_list(&db, &cli.user, all)
                }
                Some(RecurringAction::Add {
                    merchant,
                    amount,
                    frequency,
                    day_of_month,
                    last_date,
                    category,
                    confidence,
                }) => commands::cmd_recurring_add(
                    &db,
                    &cli.user,
                    &merchant,
                    amount,
                    &frequency,
                    day_of_month,
                    last_date.as_deref(),
                    category,
                    confidence,
                ),
                Some(RecurringAction::Deactivate { id }) => {
                    commands::cmd_recurring_deactivate(&db, id)
                }
                Some(RecurringAction::Delete { id }) => commands::cmd_recurring_delete(&db, id),
            }
        }
        Commands::Predictions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                PredictionsAction::List { from, to } => {
                    commands::cmd_predictions_list(&db, &cli.user, &from, &to)
                }
                PredictionsAction::Latest { model, limit } => {
                    commands::cmd_predictions_latest(&db, &cli.user, &model, limit)
                }
                PredictionsAction::Prune { before } => {
                    commands::cmd_predictions_prune(&db, &cli.user, &before)
                }
            }
        }
    }
}
