use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::sample::Position;
use super::series::SampleSeries;

/// Geographic rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest rectangle enclosing every position, or `None` for no positions.
    pub fn enclosing<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        positions.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self::new(p.lat, p.lng, p.lat, p.lng),
                Some(b) => Self::new(
                    b.south.min(p.lat),
                    b.west.min(p.lng),
                    b.north.max(p.lat),
                    b.east.max(p.lng),
                ),
            })
        })
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.lat >= self.south
            && position.lat <= self.north
            && position.lng >= self.west
            && position.lng <= self.east
    }
}

/// Absolute epoch-millisecond interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeRange {
    pub from: f64,
    pub to: f64,
}

impl TimeRange {
    pub fn to_utc(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let from = DateTime::from_timestamp_millis(self.from as i64)?;
        let to = DateTime::from_timestamp_millis(self.to as i64)?;
        Some((from, to))
    }
}

/// Time interval spanned by the samples inside `bounds`, or `None` if no
/// sample falls inside.
pub fn map_bounds_to_range(
    bounds: &LatLngBounds,
    series: &SampleSeries<Position>,
) -> Option<TimeRange> {
    let (from, to) = series
        .iter()
        .filter(|s| bounds.contains(&s.value))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(from, to), s| {
            (from.min(s.timestamp), to.max(s.timestamp))
        });

    if from.is_finite() && to.is_finite() {
        Some(TimeRange { from, to })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::sample::Sample;

    fn track() -> SampleSeries<Position> {
        SampleSeries::from_samples(vec![
            Sample::new(10.0, Position::new(1.0, 10.0)),
            Sample::new(20.0, Position::new(2.0, 20.0)),
            Sample::new(30.0, Position::new(3.0, 30.0)),
        ])
        .unwrap()
    }

    #[test]
    fn box_around_single_sample() {
        let bounds = LatLngBounds::new(1.5, 15.0, 2.5, 25.0);
        assert_eq!(
            map_bounds_to_range(&bounds, &track()),
            Some(TimeRange { from: 20.0, to: 20.0 })
        );
    }

    #[test]
    fn box_around_nothing() {
        let bounds = LatLngBounds::new(-10.0, -10.0, -5.0, -5.0);
        assert_eq!(map_bounds_to_range(&bounds, &track()), None);
    }

    #[test]
    fn edges_are_inclusive() {
        let bounds = LatLngBounds::new(1.0, 10.0, 2.0, 20.0);
        assert_eq!(
            map_bounds_to_range(&bounds, &track()),
            Some(TimeRange { from: 10.0, to: 20.0 })
        );
    }

    #[test]
    fn inverted_box_contains_nothing() {
        let bounds = LatLngBounds::new(3.0, 30.0, 1.0, 10.0);
        assert_eq!(map_bounds_to_range(&bounds, &track()), None);
    }

    #[test]
    fn range_uses_raw_timestamps() {
        let series = SampleSeries::from_samples(vec![
            Sample::new(1_700_000_000_123.0, Position::new(0.0, 0.0)),
            Sample::new(1_700_000_004_567.0, Position::new(0.1, 0.1)),
        ])
        .unwrap();
        let bounds = LatLngBounds::new(-1.0, -1.0, 1.0, 1.0);
        let range = map_bounds_to_range(&bounds, &series).unwrap();
        assert_eq!(range.from, 1_700_000_000_123.0);
        assert_eq!(range.to, 1_700_000_004_567.0);

        let (from, to) = range.to_utc().unwrap();
        assert_eq!(from.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(to.timestamp_millis(), 1_700_000_004_567);
    }

    #[test]
    fn enclosing_bounds() {
        let series = track();
        let positions = series.positions();
        assert_eq!(
            LatLngBounds::enclosing(&positions),
            Some(LatLngBounds::new(1.0, 10.0, 3.0, 30.0))
        );
        assert_eq!(LatLngBounds::enclosing(&Vec::<Position>::new()), None);
    }
}
