use serde::Serialize;

/// Immutable audit entry written after each successful reminder dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderHistoryEntry {
    pub id: i64,
    pub leave_request_id: i64,
    pub worker_id: String,
    pub tier: i64,
    pub sent_at: String, // ISO8601
    pub destination: String,
    pub message: String,
}

/// Aggregate outcome of one reminder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderRun {
    pub sent: u32,
    pub failed: u32,
}
