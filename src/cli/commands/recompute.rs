use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::recompute::recompute_all;
use crate::core::scheduler::{Clock, SystemClock};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Recompute = cmd {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let stats = recompute_all(&pool.conn, cfg, SystemClock.today())?;

        success(format!(
            "Recompute: {} examined, {} updated, {} leaves completed, {} conflicts, {} skipped.",
            stats.examined, stats.updated, stats.completed_leaves, stats.conflicts, stats.skipped
        ));
    }
    Ok(())
}
