//! HTML rendering: the selected events become a single self-contained
//! Gantt page.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use minijinja::context;

use crate::output::write_output;
use crate::templates;
use crate::types::EventView;

/// The chart anchors one minute before the earliest rendered slice.
const ANCHOR_LEAD_MS: i64 = 60_000;

pub fn write_html(events: &BTreeMap<String, EventView>, out_file: &str) -> Result<()> {
    let page = render_page(templates::TIMELINE, events)?;
    write_output(out_file, page.as_bytes())
}

pub fn write_html_datadog(events: &BTreeMap<String, EventView>, out_file: &str) -> Result<()> {
    let page = render_page(templates::TIMELINE_DATADOG, events)?;
    write_output(out_file, page.as_bytes())
}

pub fn render_page(template_name: &str, events: &BTreeMap<String, EventView>) -> Result<String> {
    let minimal_ts = minimal_begin(events) - ANCHOR_LEAD_MS;
    let events_json = templates::json_for_html(events)?;
    let env = templates::environment()?;
    let template = env.get_template(template_name)?;
    let page = template
        .render(context! {
            events_json => events_json,
            minimal_ts => minimal_ts,
        })
        .context("failed to fill the template")?;
    Ok(page)
}

fn minimal_begin(events: &BTreeMap<String, EventView>) -> i64 {
    events
        .values()
        .flat_map(|event| event.slices.iter())
        .map(|slice| slice.begin)
        .min()
        .unwrap_or(i64::MAX)
}
