use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::monitoring::clear_period;
use crate::db::pool::DbPool;
use crate::db::log::log_operation;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::date;
use std::io::{self, BufRead, Write};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Clear { period, yes } = cmd {
        let period = date::parse_period(period)
            .ok_or_else(|| AppError::Validation(format!("invalid period '{}'", period)))?;

        if !*yes {
            warning(format!(
                "This deletes ALL monitoring records for period {}.",
                period
            ));
            print!("Continue? [y/N] ");
            io::stdout().flush()?;

            let mut answer = String::new();
            io::stdin().lock().read_line(&mut answer)?;
            if !answer.trim().eq_ignore_ascii_case("y") {
                println!("Aborted.");
                return Ok(());
            }
        }

        let pool = DbPool::new(&cfg.database)?;
        let deleted = clear_period(&pool.conn, &period)?;
        log_operation(
            &pool.conn,
            "clear",
            &period,
            &format!("{} records deleted", deleted),
        )?;

        success(format!("Deleted {} record(s) for period {}.", deleted, period));
    }
    Ok(())
}
