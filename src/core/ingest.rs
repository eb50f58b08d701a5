//! Bulk roster ingestion.
//!
//! Rows are processed independently: a bad row is reported with its
//! 1-based row number and a readable reason, and the batch carries on.
//! An unparseable anchor date does NOT reject an otherwise valid row;
//! partial roster data is common, and the other columns still matter.
//! Re-uploading a worker within the same reporting period overwrites
//! the earlier record (corrective re-uploads, last write wins).

use crate::config::Config;
use crate::core::status;
use crate::db::{log, monitoring};
use crate::errors::{AppError, AppResult};
use crate::models::monitoring::{EntitlementTier, MonitoringRecord};
use crate::models::raw_row::{IngestSummary, RawRow, RowError};
use crate::utils::date;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn ingest_roster(
    conn: &mut Connection,
    cfg: &Config,
    today: NaiveDate,
    period: &str,
    rows: &[RawRow],
) -> AppResult<IngestSummary> {
    if rows.len() > cfg.max_batch_rows {
        return Err(AppError::Validation(format!(
            "batch of {} rows exceeds the maximum of {}",
            rows.len(),
            cfg.max_batch_rows
        )));
    }

    let mut summary = IngestSummary::default();

    // Chunked transactions keep a large upload from becoming one
    // oversized write while still bounding fsync count.
    for chunk in rows.chunks(cfg.ingest_chunk_rows.max(1)) {
        let tx = conn.transaction()?;

        for row in chunk {
            match build_record(row, cfg, today, period) {
                Ok(rec) => {
                    monitoring::upsert(&tx, &rec)?;
                    summary.accepted += 1;
                }
                Err(e) => summary.rejected.push(e),
            }
        }

        tx.commit()?;
    }

    log::log_operation(
        conn,
        "ingest",
        period,
        &format!(
            "{} accepted, {} rejected",
            summary.accepted,
            summary.rejected.len()
        ),
    )?;

    Ok(summary)
}

/// Validate one raw row and derive its initial record state.
fn build_record(
    row: &RawRow,
    cfg: &Config,
    today: NaiveDate,
    period: &str,
) -> Result<MonitoringRecord, RowError> {
    let reject = |reason: String| RowError {
        row: row.row_number,
        reason,
    };

    let worker_id = row.worker_id.trim();
    if worker_id.is_empty() {
        return Err(reject("missing worker id".to_string()));
    }

    let display_name = row.display_name.trim();
    if display_name.is_empty() {
        return Err(reject("missing display name".to_string()));
    }

    let tier = EntitlementTier::from_upload(&row.tier, cfg.default_tier())
        .ok_or_else(|| {
            reject(format!(
                "invalid entitlement tier '{}' (expected 70 or 35)",
                row.tier.trim()
            ))
        })?;

    // Anchor-date tolerance: a cell we cannot read leaves the record
    // unscheduled instead of dropping the whole row.
    let anchor_cell = row.anchor_date.trim();
    let anchor = if anchor_cell.is_empty() {
        None
    } else {
        date::normalize(anchor_cell, today, row.row_number).ok()
    };

    let (days_remaining, rec_status) = status::evaluate(anchor, today, cfg.due_window_days);
    let next_eligible = status::next_eligible(anchor, tier);

    let now = MonitoringRecord::now_iso();

    Ok(MonitoringRecord {
        id: 0, // assigned by the store
        worker_id: worker_id.to_string(),
        display_name: display_name.to_string(),
        unit_tag: opt(&row.unit_tag),
        reporting_period: period.to_string(),
        group_tag: opt(&row.group_tag),
        anchor_date: anchor,
        tier,
        next_eligible,
        days_remaining,
        status: rec_status,
        on_site_tag: opt(&row.on_site_tag),
        created_at: now.clone(),
        updated_at: now,
        version: 1,
    })
}

fn opt(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}
