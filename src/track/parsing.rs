/// One `[value, timestampMs]` pair as delivered by the host query layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub value: Option<f64>,
    pub timestamp: Option<f64>,
}

impl RawPoint {
    #[cfg(test)]
    pub fn new(value: Option<f64>, timestamp: Option<f64>) -> Self {
        Self { value, timestamp }
    }

    /// Missing elements count as null.
    pub fn from_pair(pair: &[Option<f64>]) -> Self {
        Self {
            value: pair.first().copied().flatten(),
            timestamp: pair.get(1).copied().flatten(),
        }
    }

    /// Value if present and not NaN.
    pub fn valid_value(&self) -> Option<f64> {
        self.value.filter(|v| !v.is_nan())
    }

    /// Timestamp if present and not NaN.
    pub fn valid_timestamp(&self) -> Option<f64> {
        self.timestamp.filter(|t| !t.is_nan())
    }
}

pub fn parse_datapoints(datapoints: &[Vec<Option<f64>>]) -> Vec<RawPoint> {
    datapoints.iter().map(|p| RawPoint::from_pair(p)).collect()
}

/// Keeps the most recent `max` points of a channel.
pub fn truncate_to_recent(points: Vec<RawPoint>, max: usize) -> Vec<RawPoint> {
    if points.len() <= max {
        return points;
    }
    log::warn!(
        "Channel has {} points, keeping the most recent {}",
        points.len(),
        max
    );
    let skip = points.len() - max;
    points.into_iter().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_pairs_are_null() {
        assert_eq!(RawPoint::from_pair(&[]), RawPoint::new(None, None));
        assert_eq!(RawPoint::from_pair(&[Some(1.0)]), RawPoint::new(Some(1.0), None));
    }

    #[test]
    fn nan_is_not_valid() {
        let p = RawPoint::new(Some(f64::NAN), Some(f64::NAN));
        assert_eq!(p.valid_value(), None);
        assert_eq!(p.valid_timestamp(), None);
    }

    #[test]
    fn truncation_keeps_tail() {
        let points: Vec<_> = (0..5)
            .map(|i| RawPoint::new(Some(i as f64), Some(i as f64)))
            .collect();
        let kept = truncate_to_recent(points, 2);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].timestamp, Some(3.0));
        assert_eq!(kept[1].timestamp, Some(4.0));
    }
}
