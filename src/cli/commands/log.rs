use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("Operation log is empty.");
            return Ok(());
        }

        for (date, operation, target, message) in entries {
            println!("{}  {:<10} {:<12} {}", date, operation, target, message);
        }
    }
    Ok(())
}
