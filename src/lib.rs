pub mod input;
pub mod output;
pub mod reconstruct;
pub mod render;
pub mod select;
pub mod templates;
pub mod trace;
pub mod types;

pub use reconstruct::{reconstruct_events, ReconstructConfig};
pub use select::{ExtremeSelection, SelectionStrategy, ThresholdSelection};
pub use types::{Event, EventView, RawRecord, Reconstruction, Slice, SliceView, Timestamp};
