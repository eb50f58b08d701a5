use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::db::{monitoring, reminders};
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, csv, json};
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        what,
        format,
        output,
        period,
    } = cmd
    {
        let format: ExportFormat = format.parse()?;
        let pool = DbPool::new(&cfg.database)?;

        match what.to_lowercase().as_str() {
            "monitoring" => {
                let records = monitoring::list(&pool.conn, None, period.as_deref())?;
                match format {
                    ExportFormat::Csv => csv::write_monitoring(output, &records)?,
                    ExportFormat::Json => json::write_json(output, &records)?,
                }
                success(format!("Exported {} monitoring record(s) to {}", records.len(), output));
            }
            "history" => {
                let entries = reminders::load_history(&pool.conn)?;
                match format {
                    ExportFormat::Csv => csv::write_history(output, &entries)?,
                    ExportFormat::Json => json::write_json(output, &entries)?,
                }
                success(format!("Exported {} history entry(ies) to {}", entries.len(), output));
            }
            other => {
                return Err(AppError::Validation(format!(
                    "unknown export target '{}' (expected monitoring or history)",
                    other
                )));
            }
        }
    }
    Ok(())
}
