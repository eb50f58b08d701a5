pub mod clear;
pub mod config;
pub mod export;
pub mod history;
pub mod ingest;
pub mod init;
pub mod list;
pub mod log;
pub mod recompute;
pub mod remind;
pub mod resolve;
pub mod watch;
