use super::error::TrackError;
use super::parsing::RawPoint;
use super::sample::{Heading, Position, Sample};

/// Time-ordered samples of one channel. Built fresh on every data update.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSeries<V> {
    samples: Vec<Sample<V>>,
}

impl<V> Default for SampleSeries<V> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
        }
    }
}

impl<V> SampleSeries<V> {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fails if timestamps decrease anywhere in `samples`.
    pub fn from_samples(samples: Vec<Sample<V>>) -> Result<Self, TrackError> {
        for (index, pair) in samples.windows(2).enumerate() {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(TrackError::OutOfOrder {
                    index: index + 1,
                    previous: pair[0].timestamp,
                    timestamp: pair[1].timestamp,
                });
            }
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample<V>> {
        self.samples.get(index)
    }

    pub fn first(&self) -> Option<&Sample<V>> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample<V>> {
        self.samples.last()
    }

    pub fn samples(&self) -> &[Sample<V>] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample<V>> {
        self.samples.iter()
    }
}

impl SampleSeries<Position> {
    /// Pairs latitude and longitude points by index. The position timestamp is
    /// taken from the latitude point.
    pub fn build_positions(lats: &[RawPoint], lngs: &[RawPoint]) -> Result<Self, TrackError> {
        if lats.len() != lngs.len() {
            log::debug!(
                "Latitude/longitude length mismatch ({} vs {}), pairing common prefix",
                lats.len(),
                lngs.len()
            );
        }

        let samples: Vec<_> = lats
            .iter()
            .zip(lngs)
            .filter_map(|(lat, lng)| {
                Some(Sample::new(
                    lat.valid_timestamp()?,
                    Position::new(lat.valid_value()?, lng.valid_value()?),
                ))
            })
            .collect();

        let dropped = lats.len().min(lngs.len()) - samples.len();
        if dropped > 0 {
            log::debug!("Dropped {} malformed position samples", dropped);
        }

        Self::from_samples(samples)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

impl SampleSeries<Heading> {
    pub fn build_headings(points: &[RawPoint]) -> Result<Self, TrackError> {
        let samples: Vec<_> = points
            .iter()
            .filter_map(|p| Some(Sample::new(p.valid_timestamp()?, p.valid_value()?)))
            .collect();

        if samples.len() < points.len() {
            log::debug!(
                "Dropped {} malformed heading samples",
                points.len() - samples.len()
            );
        }

        Self::from_samples(samples)
    }
}
