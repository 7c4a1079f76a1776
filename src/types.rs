use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

/// Timestamps carry no zone information: the input format decides what the
/// wall-clock values mean, and epoch conversions treat them as UTC.
pub type Timestamp = NaiveDateTime;

const TIME_ONLY_MS: &str = "%H:%M:%S%.3f";

pub fn timestamp_millis(ts: Timestamp) -> i64 {
    ts.and_utc().timestamp_millis()
}

pub fn time_of_day_string(ts: Timestamp) -> String {
    ts.format(TIME_ONLY_MS).to_string()
}

/// One input row reduced to the three configured columns.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub id: String,
    pub timestamp: String,
    pub message: String,
}

/// One begin→end interval inside an event. A slice exists from the moment
/// its begin marker is seen; `end` stays empty until a matching end marker
/// arrives (and may stay empty forever).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub operation: String,
    pub begin: Timestamp,
    pub end: Option<Timestamp>,
}

/// All slices reconstructed for one identifier, in the order their begin
/// markers appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub slices: Vec<Slice>,
}

impl Event {
    pub fn new(id: String) -> Event {
        Event {
            id,
            slices: Vec::new(),
        }
    }
}

/// Output of the reconstruction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    pub events: HashMap<String, Event>,
    /// Identifiers that were ongoing at the moment the ongoing set first
    /// reached its largest size.
    pub extreme: HashSet<String>,
}

/// Render-ready form of an event: only slices that survived selection,
/// with timestamps flattened to milliseconds since epoch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EventView {
    pub id: String,
    pub slices: Vec<SliceView>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SliceView {
    pub operation: String,
    pub tooltip: String,
    pub begin: i64,
    pub end: i64,
}

impl SliceView {
    /// Durations are signed: an end before its begin passes through as-is.
    pub fn new(operation: &str, begin: Timestamp, end: Timestamp) -> SliceView {
        let begin_ms = timestamp_millis(begin);
        let end_ms = timestamp_millis(end);
        let duration_ms = end_ms - begin_ms;
        SliceView {
            operation: operation.to_string(),
            tooltip: format!(
                "<b>Duration</b>: {}.{} sec<br /><b>Time</b>: {} ... {}",
                duration_ms / 1000,
                duration_ms % 1000,
                time_of_day_string(begin),
                time_of_day_string(end)
            ),
            begin: begin_ms,
            end: end_ms,
        }
    }
}

#[test]
fn slice_view_formats_duration_and_times() {
    let begin = NaiveDateTime::parse_from_str("2024-05-01 10:00:00.000", "%Y-%m-%d %H:%M:%S%.f")
        .unwrap();
    let end =
        NaiveDateTime::parse_from_str("2024-05-01 10:00:02.500", "%Y-%m-%d %H:%M:%S%.f").unwrap();
    let view = SliceView::new("commit", begin, end);
    assert_eq!(
        view.tooltip,
        "<b>Duration</b>: 2.500 sec<br /><b>Time</b>: 10:00:00.000 ... 10:00:02.500"
    );
    assert_eq!(view.end - view.begin, 2500);
}
