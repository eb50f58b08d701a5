pub mod leave_request;
pub mod monitoring;
pub mod raw_row;
pub mod reminder;
