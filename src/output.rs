//! Output formatting and persistence for analysis results.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value as pretty-printed JSON to `out`.
pub fn write_json<W: Write>(mut out: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Prints a value as pretty-printed JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    write_json(std::io::stdout().lock(), value)
}

/// Saves a value as pretty-printed JSON, replacing any existing file.
pub fn save_json(path: &str, value: &impl Serialize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    write_json(file, value)?;
    info!(path, "JSON written");
    Ok(())
}

/// Writes records as CSV rows with a header, replacing any existing file.
///
/// `None` fields become empty cells.
pub fn write_records<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    debug!(path, records = records.len(), "Writing CSV records");

    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path, records = records.len(), "CSV written");
    Ok(())
}
