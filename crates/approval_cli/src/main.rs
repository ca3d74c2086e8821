//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `approval_core` wiring: configuration, logging, storage.
//! - Print a deterministic dashboard summary of the configured store.

use approval_core::db::open_db;
use approval_core::{init_logging, ApprovalService, SqliteSubmissionRepository, StoreConfig};
use log::info;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("approval_core ping={}", approval_core::ping());
    println!("approval_core version={}", approval_core::core_version());

    let config = StoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, log_dir)?;
    }

    config.ensure_db_parent_dir()?;
    let conn = open_db(&config.db_path)?;
    let service = ApprovalService::new(SqliteSubmissionRepository::try_new(&conn)?);
    let summary = service.summary()?;

    info!(
        "event=cli_summary module=cli status=ok total={} pending={} fully_approved={} rejected={}",
        summary.total, summary.pending, summary.fully_approved, summary.rejected
    );
    println!("db_path={}", config.db_path.display());
    println!(
        "total={} pending={} fully_approved={} rejected={}",
        summary.total, summary.pending, summary.fully_approved, summary.rejected
    );
    match summary.approval_rate_percent() {
        Some(rate) => println!("approval_rate={rate:.1}%"),
        None => println!("approval_rate=n/a"),
    }

    Ok(())
}
