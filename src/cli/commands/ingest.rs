//! `ingest` command: read a worksheet CSV export and run it through the
//! bulk ingestor. Column headers are matched leniently, since uploads
//! come from several spreadsheet templates.

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::ingest::ingest_roster;
use crate::core::scheduler::{Clock, SystemClock};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::raw_row::{RawRow, RowError};
use crate::ui::messages::{detail, header, success, warning};
use crate::utils::date;
use csv::StringRecord;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Ingest { file, period } = cmd {
        let period = match period {
            Some(p) => date::parse_period(p)
                .ok_or_else(|| AppError::Validation(format!("invalid period '{}'", p)))?,
            None => date::period_of(SystemClock.today()),
        };

        let (rows, unreadable) = read_rows(file)?;

        let mut pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        let today = SystemClock.today();
        let mut summary = ingest_roster(&mut pool.conn, cfg, today, &period, &rows)?;

        summary.rejected.extend(unreadable);
        summary.rejected.sort_by_key(|e| e.row);

        header(format!("Ingest {} (period {})", file, period));
        success(format!(
            "{} succeeded, {} failed",
            summary.accepted,
            summary.rejected.len()
        ));
        for e in &summary.rejected {
            detail(format!("row {}: {}", e.row, e.reason));
        }
        if !summary.rejected.is_empty() {
            warning("Rejected rows were skipped; fix them and re-upload (re-uploads overwrite).");
        }
    }
    Ok(())
}

/// Read the CSV into raw rows. Unreadable lines become per-row errors,
/// never a batch failure.
fn read_rows(file: &str) -> AppResult<(Vec<RawRow>, Vec<RowError>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(file)?;

    let headers = rdr.headers()?.clone();
    let cols = ColumnMap::from_headers(&headers);

    let mut rows = Vec::new();
    let mut unreadable = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let row_number = i + 1; // 1-based over data rows

        match result {
            Ok(record) => rows.push(cols.to_raw_row(&record, row_number)),
            Err(e) => unreadable.push(RowError {
                row: row_number,
                reason: format!("unreadable row: {}", e),
            }),
        }
    }

    Ok((rows, unreadable))
}

/// Header-name resolution across the known upload templates.
struct ColumnMap {
    worker_id: Option<usize>,
    display_name: Option<usize>,
    unit_tag: Option<usize>,
    group_tag: Option<usize>,
    tier: Option<usize>,
    anchor_date: Option<usize>,
    on_site_tag: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |candidates: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase();
                candidates.iter().any(|c| h == *c)
            })
        };

        Self {
            worker_id: find(&["worker_id", "nik", "employee_id", "id"]),
            display_name: find(&["display_name", "name", "nama"]),
            unit_tag: find(&["unit_tag", "unit", "vehicle", "no_lambung"]),
            group_tag: find(&["group_tag", "group", "investor"]),
            tier: find(&["tier", "entitlement", "roster"]),
            anchor_date: find(&["anchor_date", "last_leave_date", "leave_date", "tanggal_cuti"]),
            on_site_tag: find(&["on_site_tag", "on_site", "site"]),
        }
    }

    fn to_raw_row(&self, record: &StringRecord, row_number: usize) -> RawRow {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .unwrap_or("")
                .trim()
                .to_string()
        };

        RawRow {
            row_number,
            worker_id: cell(self.worker_id),
            display_name: cell(self.display_name),
            unit_tag: cell(self.unit_tag),
            group_tag: cell(self.group_tag),
            tier: cell(self.tier),
            anchor_date: cell(self.anchor_date),
            on_site_tag: cell(self.on_site_tag),
        }
    }
}
