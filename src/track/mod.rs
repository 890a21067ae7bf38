mod bounds;
mod error;
mod nearest;
mod parsing;
mod sample;
mod series;

pub use bounds::{map_bounds_to_range, LatLngBounds, TimeRange};
pub use error::TrackError;
pub use nearest::nearest_at_or_before;
pub use parsing::{parse_datapoints, truncate_to_recent, RawPoint};
pub use sample::{Heading, Position};
pub use series::SampleSeries;
