//! Recurring catalogue command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use flowcast_core::forecast::recurring::next_occurrence;
use flowcast_core::{Database, Frequency, NewRecurringTransaction};

use super::{parse_date_arg, truncate};

pub fn cmd_recurring_list(db: &Database, user: &str, all: bool) -> Result<()> {
    let entries = if all {
        db.list_recurring(user)?
    } else {
        db.list_active_recurring(user)?
    };

    if entries.is_empty() {
        println!("No recurring transactions catalogued yet. Run:");
        println!("  flowcast recurring add --merchant RENT --amount -1800 --frequency monthly");
        return Ok(());
    }

    println!();
    println!("📋 Recurring Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in entries {
        let status_icon = if entry.is_active { "✅" } else { "🚫" };
        println!(
            "   {} #{:<4} {:20} │ {:>10}/{:<9} │ next {}",
            status_icon,
            entry.id,
            truncate(&entry.merchant_name, 20),
            format!("${:.2}", entry.amount),
            entry.frequency.as_str(),
            entry.next_predicted_date
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_recurring_add(
    db: &Database,
    user: &str,
    merchant: &str,
    amount: f64,
    frequency: &str,
    day_of_month: Option<u32>,
    last_date: Option<&str>,
    category: Option<String>,
    confidence: f64,
) -> Result<()> {
    let frequency: Frequency = frequency
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown frequency: {} (use weekly, biweekly, monthly, quarterly, or annual)", frequency))?;

    let last_date = last_date
        .map(|s| parse_date_arg(s, "--last-date"))
        .transpose()?
        .unwrap_or_else(|| Utc::now().date_naive());

    let next = next_occurrence(frequency, day_of_month, last_date, last_date)
        .context("No next occurrence found for this schedule")?;

    let entry = db.insert_recurring(
        &NewRecurringTransaction {
            user_id: user.to_string(),
            merchant_name: merchant.to_string(),
            amount,
            frequency,
            day_of_month,
            last_date,
            category,
            confidence,
        },
        next,
    )?;

    println!(
        "✅ Added {} (ID: {}), next occurrence {}",
        entry.merchant_name, entry.id, entry.next_predicted_date
    );

    Ok(())
}

pub fn cmd_recurring_deactivate(db: &Database, id: i64) -> Result<()> {
    db.deactivate_recurring(id)?;
    println!("✅ Recurring transaction deactivated (ID: {})", id);
    println!("   It will no longer appear in forecasts. Use 'recurring list --all' to see it.");
    Ok(())
}

pub fn cmd_recurring_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_recurring(id)?;
    println!("✅ Recurring transaction deleted (ID: {})", id);
    Ok(())
}
