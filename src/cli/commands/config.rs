use crate::cli::parser::Commands;
use crate::config::{Config, migrate};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate: do_migrate,
    } = cmd
    {
        if *print_config {
            let path = Config::config_file();
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                println!("{}", content);
            } else {
                warning(format!("No config file at {:?}; using defaults.", path));
            }
        }

        if *check {
            let missing = migrate::missing_keys()?;
            if missing.is_empty() {
                success("Configuration file is complete.");
            } else {
                warning(format!("Missing configuration keys: {}", missing.join(", ")));
            }
        }

        if *do_migrate {
            let pool = DbPool::new(&cfg.database)?;
            migrate::migrate_add_engine_parameters(&pool.conn).map_err(AppError::Db)?;
            info("Configuration migrations checked.");
        }
    }
    Ok(())
}
