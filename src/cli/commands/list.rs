use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::monitoring;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::monitoring::LeaveStatus;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { status, period } = cmd {
        let status_filter = match status {
            Some(s) => Some(
                LeaveStatus::from_db_str(s)
                    .ok_or_else(|| AppError::InvalidStatus(s.clone()))?,
            ),
            None => None,
        };

        let pool = DbPool::new(&cfg.database)?;
        let records = monitoring::list(&pool.conn, status_filter, period.as_deref())?;

        if records.is_empty() {
            println!("No monitoring records found.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column { header: "ID".to_string(), width: 5 },
            Column { header: "WORKER".to_string(), width: 12 },
            Column { header: "NAME".to_string(), width: 22 },
            Column { header: "PERIOD".to_string(), width: 8 },
            Column { header: "ANCHOR".to_string(), width: 11 },
            Column { header: "TIER".to_string(), width: 5 },
            Column { header: "NEXT".to_string(), width: 11 },
            Column { header: "DAYS".to_string(), width: 6 },
            Column { header: "STATUS".to_string(), width: 11 },
        ]);

        for rec in &records {
            table.add_row(vec![
                rec.id.to_string(),
                rec.worker_id.clone(),
                rec.display_name.clone(),
                rec.reporting_period.clone(),
                rec.anchor_str(),
                rec.tier.days().to_string(),
                rec.next_eligible_str(),
                rec.days_remaining.map(|d| d.to_string()).unwrap_or_default(),
                rec.status.to_db_str().to_string(),
            ]);
        }

        print!("{}", table.render());
        println!("{} record(s).", records.len());
    }
    Ok(())
}
