pub mod approval;
pub mod cache;
pub mod ingest;
pub mod recompute;
pub mod reminders;
pub mod scheduler;
pub mod status;
