//! CSV parser for wide-format quiz exports.

use anyhow::{Context, Result};

use crate::analyzers::types::RawRow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes a CSV export into one [`RawRow`] per participant.
///
/// The first record is the header. Short records simply lack their trailing
/// columns; blank lines are skipped.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 CSV.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr.headers().context("failed to read CSV header")?.clone();
    let mut rows = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("failed to parse CSV record {}", idx + 1))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
