//! Selection strategies decide which reconstructed slices are worth
//! rendering. Both strategies drop slices that never saw an end marker and
//! drop events left with nothing to show.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::TimeDelta;

use crate::types::{Event, EventView, SliceView};

/// The output map is ordered so every renderer downstream behaves the same
/// from run to run.
pub trait SelectionStrategy {
    fn select(&self, events: &HashMap<String, Event>) -> BTreeMap<String, EventView>;
}

/// Keeps every finished slice whose duration reaches the threshold,
/// inclusive.
pub struct ThresholdSelection {
    pub threshold: TimeDelta,
}

impl SelectionStrategy for ThresholdSelection {
    fn select(&self, events: &HashMap<String, Event>) -> BTreeMap<String, EventView> {
        let mut to_render = BTreeMap::new();
        for (trace_id, event) in events {
            let mut slices = Vec::new();
            for slice in &event.slices {
                let Some(end) = slice.end else { continue };
                if end.signed_duration_since(slice.begin) < self.threshold {
                    continue;
                }
                slices.push(SliceView::new(&slice.operation, slice.begin, end));
            }
            if !slices.is_empty() {
                to_render.insert(
                    trace_id.clone(),
                    EventView {
                        id: trace_id.clone(),
                        slices,
                    },
                );
            }
        }
        to_render
    }
}

/// Keeps only the identifiers that were ongoing at the busiest moment.
/// The threshold does not apply here, short slices show up too.
pub struct ExtremeSelection {
    pub extreme: HashSet<String>,
}

impl SelectionStrategy for ExtremeSelection {
    fn select(&self, events: &HashMap<String, Event>) -> BTreeMap<String, EventView> {
        let mut to_render = BTreeMap::new();
        for (trace_id, event) in events {
            if !self.extreme.contains(trace_id) {
                continue;
            }
            let mut slices = Vec::new();
            for slice in &event.slices {
                let Some(end) = slice.end else { continue };
                slices.push(SliceView::new(&slice.operation, slice.begin, end));
            }
            if !slices.is_empty() {
                to_render.insert(
                    trace_id.clone(),
                    EventView {
                        id: trace_id.clone(),
                        slices,
                    },
                );
            }
        }
        to_render
    }
}
