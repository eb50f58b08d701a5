use chrono::NaiveDate;
use serde::Serialize;

/// A concrete leave request emitted by an approval. The surrounding
/// application owns the full leave-request lifecycle; this engine only
/// creates approved requests and reads back approved upcoming ones.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveRequest {
    pub id: i64,
    pub worker_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
    pub attachment: Option<String>,
    pub status: String, // 'approved' | 'pending' | 'rejected'
    pub created_at: String,
}
