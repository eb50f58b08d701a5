use crate::models::monitoring::MonitoringRecord;
use crate::models::reminder::ReminderHistoryEntry;
use csv::Writer;

/// Write monitoring records as CSV to the given file.
pub fn write_monitoring(path: &str, records: &[MonitoringRecord]) -> std::io::Result<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record([
        "worker_id",
        "display_name",
        "reporting_period",
        "group_tag",
        "anchor_date",
        "tier",
        "next_eligible",
        "days_remaining",
        "status",
    ])?;

    for rec in records {
        wtr.write_record(&[
            rec.worker_id.clone(),
            rec.display_name.clone(),
            rec.reporting_period.clone(),
            rec.group_tag.clone().unwrap_or_default(),
            rec.anchor_str(),
            rec.tier.days().to_string(),
            rec.next_eligible_str(),
            rec.days_remaining.map(|d| d.to_string()).unwrap_or_default(),
            rec.status.to_db_str().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write reminder history entries as CSV to the given file.
pub fn write_history(path: &str, entries: &[ReminderHistoryEntry]) -> std::io::Result<()> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record([
        "leave_request_id",
        "worker_id",
        "tier",
        "sent_at",
        "destination",
        "message",
    ])?;

    for e in entries {
        wtr.write_record(&[
            e.leave_request_id.to_string(),
            e.worker_id.clone(),
            e.tier.to_string(),
            e.sent_at.clone(),
            e.destination.clone(),
            e.message.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
