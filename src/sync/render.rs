use serde::Serialize;
use utoipa::ToSchema;

use super::types::Marker;
use crate::track::{LatLngBounds, Position, TimeRange};

/// Map-side collaborator. Markers passed as `None` are hidden.
pub trait TrackRenderer {
    fn render_track(&mut self, points: &[Position]);
    fn set_last_position_marker(&mut self, marker: Option<Marker>);
    fn set_hover_marker(&mut self, marker: Option<Marker>);
    fn set_viewport(&mut self, bounds: LatLngBounds);
    /// Default unzoomed world view, shown instead of a track.
    fn show_world_view(&mut self);
    fn set_style(&mut self, line_color: &str, point_color: &str);
}

/// Host-side collaborator receiving time-range change requests.
pub trait TimeRangeSetter {
    fn set_time_range(&mut self, range: TimeRange);
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOp {
    RenderTrack { points: usize },
    LastPositionMarker { marker: Option<Marker> },
    HoverMarker { marker: Option<Marker> },
    Viewport { bounds: LatLngBounds },
    WorldView,
    Style { line_color: String, point_color: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ViewState {
    pub track: Vec<Position>,
    pub last_position: Option<Marker>,
    pub hover: Option<Marker>,
    pub viewport: Option<LatLngBounds>,
    pub world_view: bool,
    pub line_color: String,
    pub point_color: String,
}

/// Keeps the resulting view plus, unless built with `view_only`, a log of
/// every requested operation.
#[derive(Debug)]
pub struct RecordingRenderer {
    view: ViewState,
    ops: Vec<RenderOp>,
    log_ops: bool,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self {
            view: ViewState::default(),
            ops: Vec::new(),
            log_ops: true,
        }
    }
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks the view only. Used by long-lived panels where nobody drains
    /// the log.
    pub fn view_only() -> Self {
        Self {
            log_ops: false,
            ..Self::default()
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[cfg(test)]
    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }

    fn record(&mut self, op: RenderOp) {
        if self.log_ops {
            self.ops.push(op);
        }
    }
}

impl TrackRenderer for RecordingRenderer {
    fn render_track(&mut self, points: &[Position]) {
        self.view.track = points.to_vec();
        self.view.world_view = false;
        self.record(RenderOp::RenderTrack {
            points: points.len(),
        });
    }

    fn set_last_position_marker(&mut self, marker: Option<Marker>) {
        self.view.last_position = marker;
        self.record(RenderOp::LastPositionMarker { marker });
    }

    fn set_hover_marker(&mut self, marker: Option<Marker>) {
        self.view.hover = marker;
        self.record(RenderOp::HoverMarker { marker });
    }

    fn set_viewport(&mut self, bounds: LatLngBounds) {
        self.view.viewport = Some(bounds);
        self.view.world_view = false;
        self.record(RenderOp::Viewport { bounds });
    }

    fn show_world_view(&mut self) {
        self.view.track.clear();
        self.view.last_position = None;
        self.view.viewport = None;
        self.view.world_view = true;
        self.record(RenderOp::WorldView);
    }

    fn set_style(&mut self, line_color: &str, point_color: &str) {
        self.view.line_color = line_color.to_string();
        self.view.point_color = point_color.to_string();
        self.record(RenderOp::Style {
            line_color: line_color.to_string(),
            point_color: point_color.to_string(),
        });
    }
}

#[derive(Debug)]
pub struct RecordingTimeRange {
    requests: Vec<TimeRange>,
    last: Option<TimeRange>,
    log_requests: bool,
}

impl Default for RecordingTimeRange {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            last: None,
            log_requests: true,
        }
    }
}

impl RecordingTimeRange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers the most recent request only.
    pub fn last_only() -> Self {
        Self {
            log_requests: false,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn requests(&self) -> &[TimeRange] {
        &self.requests
    }

    pub fn last(&self) -> Option<TimeRange> {
        self.last
    }

    pub fn take_requests(&mut self) -> Vec<TimeRange> {
        std::mem::take(&mut self.requests)
    }
}

impl TimeRangeSetter for RecordingTimeRange {
    fn set_time_range(&mut self, range: TimeRange) {
        self.last = Some(range);
        if self.log_requests {
            self.requests.push(range);
        }
    }
}
