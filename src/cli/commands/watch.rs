//! `watch` command: run the recompute pass and the reminder pipeline on
//! a fixed interval. One process instance is assumed; multi-instance
//! deployments should front this with a scheduler that holds a lock.

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::recompute::recompute_all;
use crate::core::reminders::send_due_reminders;
use crate::core::scheduler::{Clock, PeriodicRunner, SystemClock};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::gateway::{CachedDirectory, ConsoleGateway, SqliteDirectory};
use crate::ui::messages::{info, warning};
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch {
        interval_secs,
        cycles,
    } = cmd
    {
        let interval = Duration::from_secs(interval_secs.unwrap_or(cfg.watch_interval_secs));

        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let directory = CachedDirectory::new(
            SqliteDirectory::new(&pool.conn),
            cfg.cache_capacity,
            Duration::from_secs(cfg.cache_ttl_secs),
        );
        let gateway = ConsoleGateway;
        let clock = SystemClock;

        info(format!(
            "Watching every {}s (ctrl-c to stop)...",
            interval.as_secs()
        ));

        let runner = PeriodicRunner::new(interval);
        runner.run(*cycles, || {
            let today = clock.today();

            match recompute_all(&pool.conn, cfg, today) {
                Ok(stats) => info(format!(
                    "recompute: {} examined, {} updated",
                    stats.examined, stats.updated
                )),
                Err(e) => warning(format!("recompute failed: {}", e)),
            }

            match send_due_reminders(&pool.conn, cfg, &directory, &gateway, today) {
                Ok(run) => info(format!("reminders: {} sent, {} failed", run.sent, run.failed)),
                Err(e) => warning(format!("reminder run failed: {}", e)),
            }
        });
    }
    Ok(())
}
