//! CSV loading. The first row is a header; the three configured column
//! names are resolved against it once, and every following row is reduced
//! to those columns.

use anyhow::{bail, Context, Result};
use csv::StringRecord;

use crate::types::RawRecord;

/// Header names of the columns holding the identifier, timestamp and
/// message fields.
#[derive(Debug, Clone)]
pub struct FieldNames {
    pub id: String,
    pub timestamp: String,
    pub message: String,
}

pub fn load_records(path: &str, fields: &FieldNames) -> Result<Vec<RawRecord>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("failed to read the file {path}"))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read as CSV the file {path}"))?
        .clone();
    let id_idx = find_column(&headers, &fields.id, "id")?;
    let ts_idx = find_column(&headers, &fields.timestamp, "ts")?;
    let msg_idx = find_column(&headers, &fields.message, "message")?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("failed to read as CSV the file {path}"))?;
        records.push(RawRecord {
            id: row.get(id_idx).unwrap_or_default().to_string(),
            timestamp: row.get(ts_idx).unwrap_or_default().to_string(),
            message: row.get(msg_idx).unwrap_or_default().to_string(),
        });
    }
    Ok(records)
}

fn find_column(headers: &StringRecord, name: &str, role: &str) -> Result<usize> {
    match headers.iter().position(|header| header == name) {
        Some(idx) => Ok(idx),
        None => bail!(
            "{role} field {name:?} not found in header {:?}",
            headers.iter().collect::<Vec<_>>()
        ),
    }
}
