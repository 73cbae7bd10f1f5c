//! Decodes downloaded CSV exports into header + row maps.
//!
//! Wire format: UTF-8 with optional byte-order mark, comma-delimited, first
//! row is the header. Rows are kept even when shorter or longer than the
//! header; missing cells are simply absent from the row map.

use custsync_core::Result;
use custsync_core::record::RawRow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// A decoded CSV file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Decodes raw CSV bytes.
pub fn decode_csv(bytes: &[u8]) -> Result<DecodedCsv> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell.to_string()))
            .collect();
        rows.push(row);
    }

    tracing::debug!(
        columns = headers.len(),
        rows = rows.len(),
        "Decoded CSV export"
    );
    Ok(DecodedCsv { headers, rows })
}
