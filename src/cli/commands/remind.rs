use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reminders::{plan_due_reminders, send_due_reminders};
use crate::core::scheduler::{Clock, SystemClock};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::gateway::{ConsoleGateway, SqliteDirectory};
use crate::ui::messages::{detail, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Remind { dry_run } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let today = SystemClock.today();

        if *dry_run {
            // Evaluation only: nothing is dispatched, deduplicated or
            // written to the operation log.
            let planned = plan_due_reminders(&pool.conn, cfg, today)?;
            for p in &planned {
                detail(format!(
                    "leave request {} (worker {}): {}-day reminder, leave starts {}",
                    p.leave_request_id, p.worker_id, p.tier, p.start_date
                ));
            }
            success(format!(
                "Dry run: {} reminder(s) would be sent.",
                planned.len()
            ));
        } else {
            let directory = SqliteDirectory::new(&pool.conn);
            let gateway = ConsoleGateway;
            let run = send_due_reminders(&pool.conn, cfg, &directory, &gateway, today)?;
            success(format!("Reminders: {} sent, {} failed.", run.sent, run.failed));
        }
    }
    Ok(())
}
