use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::reminders::load_history;
use crate::errors::AppResult;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::History = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let entries = load_history(&pool.conn)?;

        if entries.is_empty() {
            println!("No reminders have been sent yet.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column { header: "LEAVE".to_string(), width: 6 },
            Column { header: "WORKER".to_string(), width: 12 },
            Column { header: "TIER".to_string(), width: 5 },
            Column { header: "SENT AT".to_string(), width: 26 },
            Column { header: "DESTINATION".to_string(), width: 15 },
        ]);

        for e in &entries {
            table.add_row(vec![
                e.leave_request_id.to_string(),
                e.worker_id.clone(),
                format!("{}d", e.tier),
                e.sent_at.clone(),
                e.destination.clone(),
            ]);
        }

        print!("{}", table.render());
        println!("{} entry(ies).", entries.len());
    }
    Ok(())
}
