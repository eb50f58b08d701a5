pub mod initialize;
pub mod leave_requests;
pub mod log;
pub mod migrate;
pub mod monitoring;
pub mod pool;
pub mod reminders;
pub mod workers;
