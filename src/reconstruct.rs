//! The reconstruction pass: raw CSV rows go in, per-identifier events with
//! begin/end slices come out, together with a snapshot of the busiest
//! moment. Rows are processed once, in timestamp order.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use regex::Regex;

use crate::types::{Event, RawRecord, Reconstruction, Slice, Timestamp};

/// Everything the pass needs, compiled once up front. There is no global
/// state, so reconstruction can run on any slice of records.
#[derive(Debug)]
pub struct ReconstructConfig {
    pub begin_matcher: Regex,
    pub end_matcher: Regex,
    /// When set, must capture the operation name as its only group.
    pub operation_extractor: Option<Regex>,
    /// chrono strftime format for the timestamp column.
    pub timestamp_format: String,
}

pub fn reconstruct_events(
    records: &[RawRecord],
    config: &ReconstructConfig,
) -> Result<Reconstruction> {
    let mut parsed = parse_timestamps(records, &config.timestamp_format)?;
    // Stable, so rows with equal timestamps keep their input order.
    parsed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut events: HashMap<String, Event> = HashMap::new();
    let mut ongoing: HashSet<String> = HashSet::new();
    let mut extreme: HashSet<String> = HashSet::new();

    for (ts, record) in parsed {
        let id = record.id.replace('"', "");
        if id.is_empty() {
            continue;
        }

        let event = events
            .entry(id.clone())
            .or_insert_with(|| Event::new(id.clone()));

        if config.begin_matcher.is_match(&record.message) {
            ongoing.insert(id);
            if ongoing.len() > extreme.len() {
                extreme = ongoing.clone();
            }
            let operation =
                extract_operation(config.operation_extractor.as_ref(), &record.message);
            event.slices.push(Slice {
                operation,
                begin: ts,
                end: None,
            });
        } else if config.end_matcher.is_match(&record.message) {
            ongoing.remove(&id);
            // An end marker always lands on the last appended slice, even
            // one that is already closed. Interleaved operations under one
            // identifier are not paired up.
            match event.slices.last_mut() {
                Some(last) => last.end = Some(ts),
                None => log::warn!("Event without slices encountered for ID {id}"),
            }
        }
    }

    Ok(Reconstruction { events, extreme })
}

fn parse_timestamps<'a>(
    records: &'a [RawRecord],
    format: &str,
) -> Result<Vec<(Timestamp, &'a RawRecord)>> {
    let mut parsed = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let ts = NaiveDateTime::parse_from_str(&record.timestamp, format).with_context(|| {
            format!(
                "failed to parse timestamp rowNumber={}, row={:?}",
                index + 1,
                record.timestamp
            )
        })?;
        parsed.push((ts, record));
    }
    Ok(parsed)
}

fn extract_operation(extractor: Option<&Regex>, message: &str) -> String {
    let Some(extractor) = extractor else {
        return String::new();
    };
    match extractor.captures(message) {
        Some(captures) if captures.len() == 2 => captures
            .get(1)
            .map(|group| group.as_str().to_string())
            .unwrap_or_default(),
        unexpected => {
            log::warn!("Unexpected matches in string {message}: {unexpected:?}");
            String::new()
        }
    }
}
