use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::approval::{Decision, Overrides, Resolution, resolve};
use crate::core::scheduler::{Clock, SystemClock};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Resolve {
        id,
        approve,
        reject,
        start,
        end,
        leave_type,
        attachment,
    } = cmd
    {
        let decision = match (approve, reject) {
            (true, false) => Decision::Approve,
            (false, true) => Decision::Reject,
            _ => {
                return Err(AppError::Validation(
                    "pass exactly one of --approve or --reject".to_string(),
                ));
            }
        };

        let overrides = Overrides {
            start_date: parse_opt_date(start)?,
            end_date: parse_opt_date(end)?,
            leave_type: leave_type.clone(),
            attachment: attachment.clone(),
        };

        let mut pool = DbPool::new(&cfg.database)?;
        let today = SystemClock.today();

        match resolve(&mut pool.conn, cfg, today, *id, decision, &overrides)? {
            Resolution::Approved { leave_request_id } => {
                success(format!(
                    "Approved: leave request {} created; record {} is now on leave.",
                    leave_request_id, id
                ));
            }
            Resolution::Rejected => {
                success(format!("Rejected: record {} returned to active tracking.", id));
            }
            Resolution::NotDue { status } => {
                match status.as_str() {
                    "on_leave" => info(format!(
                        "Record {} is already resolved (on leave); nothing to do.",
                        id
                    )),
                    _ => warning(format!(
                        "Record {} is not due (status: {}); nothing changed.",
                        id, status
                    )),
                };
            }
        }
    }
    Ok(())
}

fn parse_opt_date(s: &Option<String>) -> AppResult<Option<chrono::NaiveDate>> {
    match s {
        Some(v) => date::parse_iso(v)
            .map(Some)
            .ok_or_else(|| AppError::InvalidDate(v.clone())),
        None => Ok(None),
    }
}
