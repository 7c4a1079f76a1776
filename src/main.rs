//! timeline-tracing: reconstruct per-trace timelines from a CSV log export
//! and render them as a Gantt page or a Chrome trace.

use anyhow::{Context, Result};
use chrono::TimeDelta;
use clap::{ArgAction, Parser, ValueEnum};
use log::info;
use regex::Regex;

use timeline_tracing::input::{self, FieldNames};
use timeline_tracing::{
    reconstruct_events, render, trace, ExtremeSelection, ReconstructConfig, SelectionStrategy,
    ThresholdSelection,
};

#[derive(Parser)]
#[command(name = "timeline-tracing")]
#[command(about = "Reconstruct per-trace timelines from CSV log exports")]
#[command(version)]
struct Args {
    /// Input CSV file
    #[arg(long)]
    csv: String,

    /// Which field will be used as ID
    #[arg(long = "fieldId")]
    field_id: String,

    /// Which field will be used as timestamp
    #[arg(long = "fieldTs")]
    field_ts: String,

    /// How to parse the ts field, in chrono strftime syntax
    #[arg(long = "tsFormat")]
    ts_format: String,

    /// Which field will be used as message
    #[arg(long = "fieldMsg")]
    field_msg: String,

    /// Regex that should have a match on a beginning message
    #[arg(long = "beginRegex")]
    begin_regex: String,

    /// Regex that should have a match on an ending message
    #[arg(long = "endRegex")]
    end_regex: String,

    /// Regex that should extract (as the first group) the operation name
    #[arg(long = "operationRegex")]
    operation_regex: Option<String>,

    /// What event length is minimal to consider it
    #[arg(long, default_value = "1s")]
    threshold: String,

    /// Where the output should be placed; an empty value writes to stdout
    #[arg(long = "outFile", default_value = "output.html")]
    out_file: String,

    /// Expose only the extreme case (the moment with most ongoing traces; ignores the threshold!)
    #[arg(long = "onlyExtreme", default_value_t = true, action = ArgAction::Set)]
    only_extreme: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Html,
    HtmlDatadog,
    TraceJson,
    TracePerfetto,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let records = input::load_records(
        &args.csv,
        &FieldNames {
            id: args.field_id.clone(),
            timestamp: args.field_ts.clone(),
            message: args.field_msg.clone(),
        },
    )?;

    let config = ReconstructConfig {
        begin_matcher: Regex::new(&args.begin_regex).context("invalid beginRegex")?,
        end_matcher: Regex::new(&args.end_regex).context("invalid endRegex")?,
        operation_extractor: match &args.operation_regex {
            Some(pattern) => Some(Regex::new(pattern).context("invalid operationRegex")?),
            None => None,
        },
        timestamp_format: args.ts_format.clone(),
    };
    let threshold = parse_threshold(&args.threshold)?;

    let reconstruction = reconstruct_events(&records, &config)?;

    // Dump the extreme moment in time.
    info!(
        "Max ongoing count of operations is: {}, listing traces:",
        reconstruction.extreme.len()
    );
    for id in &reconstruction.extreme {
        info!("\t{id}");
    }

    let strategy: Box<dyn SelectionStrategy> = if args.only_extreme {
        Box::new(ExtremeSelection {
            extreme: reconstruction.extreme.clone(),
        })
    } else {
        Box::new(ThresholdSelection { threshold })
    };
    let events_to_render = strategy.select(&reconstruction.events);

    match args.format {
        Format::Html => render::write_html(&events_to_render, &args.out_file),
        Format::HtmlDatadog => render::write_html_datadog(&events_to_render, &args.out_file),
        Format::TraceJson => trace::write_trace_json(&events_to_render, &args.out_file),
        Format::TracePerfetto => trace::write_trace_perfetto(&events_to_render, &args.out_file),
    }
}

fn parse_threshold(threshold: &str) -> Result<TimeDelta> {
    let duration = humantime::parse_duration(threshold)
        .with_context(|| format!("illegal threshold provided: {threshold:?}"))?;
    TimeDelta::from_std(duration)
        .with_context(|| format!("illegal threshold provided: {threshold:?}"))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
