//! The output pages are compiled into the binary, so a single executable
//! can render anywhere.

use anyhow::{Context, Result};
use minijinja::Environment;
use serde::Serialize;

pub const TIMELINE: &str = "timeline.html";
pub const TIMELINE_DATADOG: &str = "timeline_datadog.html";
pub const PERFETTO: &str = "perfetto.html";

pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template(TIMELINE, include_str!("../templates/timeline.html"))
        .context("failed to load the timeline template")?;
    env.add_template(
        TIMELINE_DATADOG,
        include_str!("../templates/timeline_datadog.html"),
    )
    .context("failed to load the datadog timeline template")?;
    env.add_template(PERFETTO, include_str!("../templates/perfetto.html"))
        .context("failed to load the perfetto template")?;
    Ok(env)
}

/// JSON that is safe to inline into a `<script>` block: `<`, `>` and `&`
/// become unicode escapes, so no embedded value can terminate the script.
pub fn json_for_html<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_string(value).context("failed to generate output")?;
    Ok(json
        .replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e"))
}
