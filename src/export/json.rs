use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;

/// Serialize any exportable collection as pretty JSON to the given file.
pub fn write_json<T: Serialize>(path: &str, items: &[T]) -> AppResult<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, items)
        .map_err(|e| AppError::Export(format!("JSON serialization failed: {}", e)))?;
    Ok(())
}
