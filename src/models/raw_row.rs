use serde::Serialize;

/// One row of a roster upload, as extracted from the worksheet.
/// All cells are raw strings; nothing has been validated yet.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// 1-based worksheet row number, carried through for error reporting.
    pub row_number: usize,
    pub worker_id: String,
    pub display_name: String,
    pub unit_tag: String,
    pub group_tag: String,
    /// Raw entitlement tier cell; "70", "35" or empty.
    pub tier: String,
    /// Raw anchor date cell in any of the supported shapes.
    pub anchor_date: String,
    pub on_site_tag: String,
}

/// A rejected upload row with a human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

/// Result of one bulk ingestion: how many rows were written and which
/// rows were rejected (and why). Rejections never abort the batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestSummary {
    pub accepted: u32,
    pub rejected: Vec<RowError>,
}
