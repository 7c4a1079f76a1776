//! Chrome Trace Event Format output, loadable by chrome://tracing and
//! Perfetto. Either a bare JSON document or the same document wrapped in a
//! page that hands it to ui.perfetto.dev.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use minijinja::context;
use serde::Serialize;

use crate::output::write_output;
use crate::templates;
use crate::types::{EventView, SliceView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[serde(rename = "B")]
    Begin,
    #[serde(rename = "E")]
    End,
}

/// One entry of the `traceEvents` array, serialized with the field names
/// the trace event format defines.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub name: String,
    #[serde(rename = "cat")]
    pub categories: String,
    #[serde(rename = "ph")]
    pub phase: Phase,
    /// Microseconds since epoch.
    #[serde(rename = "ts")]
    pub timestamp: i64,
    pub pid: i64,
    pub tid: i64,
    pub args: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TraceFile {
    #[serde(rename = "traceEvents")]
    pub trace_events: Vec<TraceEvent>,
    #[serde(rename = "displayTimeUnit")]
    pub display_time_unit: String,
    #[serde(rename = "otherData", skip_serializing_if = "Option::is_none")]
    pub other_data: Option<BTreeMap<String, String>>,
}

pub fn write_trace_json(events: &BTreeMap<String, EventView>, out_file: &str) -> Result<()> {
    let trace = build_trace(events);
    let payload = serde_json::to_vec(&trace).context("failed to generate output")?;
    write_output(out_file, &payload)
}

pub fn write_trace_perfetto(events: &BTreeMap<String, EventView>, out_file: &str) -> Result<()> {
    let page = render_perfetto_page(events)?;
    write_output(out_file, page.as_bytes())
}

pub fn render_perfetto_page(events: &BTreeMap<String, EventView>) -> Result<String> {
    let trace = build_trace(events);
    let data = templates::json_for_html(&trace)?;
    let env = templates::environment()?;
    let page = env
        .get_template(templates::PERFETTO)?
        .render(context! { data => data })
        .context("failed to fill the template")?;
    Ok(page)
}

/// Every event gets its own synthetic thread id, numbered from 1 in order
/// of each event's first slice begin, so rows stack the way the timeline
/// reads.
pub fn build_trace(events: &BTreeMap<String, EventView>) -> TraceFile {
    let ordered = order_events_by_start_ts(events);
    let minimal_ts = ordered
        .first()
        .and_then(|event| event.slices.first())
        .map_or(0, |slice| slice.begin);

    let mut trace_events = Vec::new();
    for (index, event) in ordered.into_iter().enumerate() {
        let tid = (index + 1) as i64;
        for slice in &event.slices {
            for (phase, millis) in [(Phase::Begin, slice.begin), (Phase::End, slice.end)] {
                trace_events.push(trace_event(event, slice, phase, millis, tid, minimal_ts));
            }
        }
    }
    TraceFile {
        trace_events,
        display_time_unit: "ms".to_string(),
        other_data: None,
    }
}

fn trace_event(
    event: &EventView,
    slice: &SliceView,
    phase: Phase,
    millis: i64,
    tid: i64,
    minimal_ts: i64,
) -> TraceEvent {
    TraceEvent {
        name: slice.operation.clone(),
        categories: String::new(),
        phase,
        timestamp: millis * 1000,
        pid: 0,
        tid,
        args: BTreeMap::from([
            ("name".to_string(), slice.operation.clone()),
            ("htmlTooltip".to_string(), slice.tooltip.clone()),
            ("trace_id".to_string(), event.id.clone()),
            (
                "trace_url".to_string(),
                format!("https://app.datadoghq.com/apm/trace/{}", event.id),
            ),
            (
                "logs_url".to_string(),
                format!(
                    "https://app.datadoghq.com/logs?query=trace_id%3A{}&from_ts={}",
                    event.id, minimal_ts
                ),
            ),
        ]),
    }
}

fn order_events_by_start_ts(events: &BTreeMap<String, EventView>) -> Vec<&EventView> {
    let mut ordered: Vec<&EventView> = events.values().collect();
    // Stable, so events starting at the same instant keep their id order.
    ordered.sort_by_key(|event| event.slices.first().map(|slice| slice.begin));
    ordered
}
