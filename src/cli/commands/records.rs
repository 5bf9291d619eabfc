//! Records command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_records(config: &Config, limit: Option<usize>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let total = store.count_records().await?;

    if total == 0 {
        println!("No report records found.");
        return Ok(());
    }

    let limit = limit.unwrap_or(config.reports.preview_rows);
    let rows = store.recent_records(limit as u64).await?;

    println!("Report records ({} total, showing {})", total, rows.len());
    println!("{:-<80}", "");

    for row in rows {
        println!(
            "{} | {:<12} | {:<10} | qty {:>5} | {:>10.2}",
            row.reportdate, row.servicecode, row.model, row.qty, row.amount
        );
    }

    Ok(())
}
