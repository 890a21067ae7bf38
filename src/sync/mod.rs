mod controller;
mod options;
mod render;
mod types;

pub use controller::TrackSyncController;
pub use options::PanelOptions;
pub use render::{
    RecordingRenderer, RecordingTimeRange, RenderOp, TimeRangeSetter, TrackRenderer, ViewState,
};
pub use types::{CursorPos, DataPayload, HoverEvent, HoverState, Marker, SeriesData, SyncState};
