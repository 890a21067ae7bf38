use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::track::{Heading, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// No data yet.
    Idle,
    /// Series populated, possibly with an empty track.
    Ready,
    /// A cursor query timestamp is active.
    Hovering,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct HoverState {
    pub active: bool,
    pub query_timestamp: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Marker {
    pub position: Position,
    /// Marker rotation in degrees, absent when no heading is available.
    pub heading: Option<Heading>,
}

/// One channel as delivered by the host query layer: `[value, timestampMs]`
/// pairs where either element may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SeriesData {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub datapoints: Vec<Vec<Option<f64>>>,
}

#[cfg(test)]
impl SeriesData {
    pub fn from_pairs(target: &str, pairs: &[(f64, f64)]) -> Self {
        Self {
            target: Some(target.to_string()),
            datapoints: pairs
                .iter()
                .map(|&(value, ts)| vec![Some(value), Some(ts)])
                .collect(),
        }
    }
}

/// Ordered channels: latitude, longitude, optional heading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DataPayload {
    #[serde(default)]
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CursorPos {
    pub x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HoverEvent {
    pub pos: CursorPos,
}
