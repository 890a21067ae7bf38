use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Heading in degrees, 0-360.
pub type Heading = f64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample<V> {
    /// Epoch milliseconds. Not required to be unique within a series.
    pub timestamp: f64,
    pub value: V,
}

impl<V> Sample<V> {
    pub fn new(timestamp: f64, value: V) -> Self {
        Self { timestamp, value }
    }
}
