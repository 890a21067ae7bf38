use super::series::SampleSeries;

/// Result of a nearest-at-or-before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub index: usize,
    /// The query timestamp matched a sample exactly.
    pub exact: bool,
}

/// Binary search for the sample with the greatest timestamp not exceeding
/// `query`. A query before every sample clamps to index 0. Returns `None` only
/// for an empty series.
pub fn nearest_at_or_before<V>(series: &SampleSeries<V>, query: f64) -> Option<Lookup> {
    let samples = series.samples();
    if samples.is_empty() {
        return None;
    }

    let mut low = 0;
    let mut high = samples.len();
    while low < high {
        let mid = low + (high - low) / 2;
        let timestamp = samples[mid].timestamp;
        if timestamp == query {
            return Some(Lookup {
                index: mid,
                exact: true,
            });
        } else if timestamp < query {
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    // `low` is now the first sample past the query (or the length)
    Some(Lookup {
        index: low.saturating_sub(1),
        exact: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::sample::Sample;

    fn series(timestamps: &[f64]) -> SampleSeries<f64> {
        SampleSeries::from_samples(timestamps.iter().map(|&t| Sample::new(t, t)).collect())
            .unwrap()
    }

    fn brute_force(timestamps: &[f64], query: f64) -> Option<f64> {
        if timestamps.is_empty() {
            return None;
        }
        let best = timestamps
            .iter()
            .copied()
            .filter(|&t| t <= query)
            .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))));
        Some(best.unwrap_or(timestamps[0]))
    }

    #[test]
    fn empty_series_is_not_found() {
        assert_eq!(nearest_at_or_before(&series(&[]), 10.0), None);
    }

    #[test]
    fn matches_linear_scan() {
        let cases: Vec<Vec<f64>> = vec![
            vec![5.0],
            vec![10.0, 20.0],
            vec![10.0, 20.0, 30.0],
            vec![10.0, 10.0, 20.0, 30.0, 30.0, 30.0, 40.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0],
            vec![0.0, 100.0, 100.0, 250.0, 1000.0, 1000.5],
        ];

        for timestamps in &cases {
            let s = series(timestamps);
            let mut query = -5.0;
            while query <= 1010.0 {
                let found = nearest_at_or_before(&s, query).unwrap();
                let got = s.get(found.index).unwrap().timestamp;
                assert_eq!(
                    Some(got),
                    brute_force(timestamps, query),
                    "series {:?} query {}",
                    timestamps,
                    query
                );
                query += 0.5;
            }
        }
    }

    #[test]
    fn every_sample_timestamp_is_exact() {
        let timestamps: Vec<f64> = (0..37)
            .map(|i| 1_600_000_000_000.0 + i as f64 * 1000.0)
            .collect();
        let s = series(&timestamps);
        for (i, t) in timestamps.iter().enumerate() {
            let found = nearest_at_or_before(&s, *t).unwrap();
            assert!(found.exact);
            assert_eq!(found.index, i);
        }
    }

    #[test]
    fn between_samples_steps_back() {
        let s = series(&[100.0, 200.0, 300.0]);
        assert_eq!(
            nearest_at_or_before(&s, 250.0),
            Some(Lookup {
                index: 1,
                exact: false
            })
        );
    }

    #[test]
    fn before_first_clamps_to_zero() {
        let s = series(&[100.0, 200.0]);
        assert_eq!(
            nearest_at_or_before(&s, 50.0),
            Some(Lookup {
                index: 0,
                exact: false
            })
        );
    }

    #[test]
    fn after_last_is_last() {
        let s = series(&[100.0, 200.0]);
        assert_eq!(nearest_at_or_before(&s, 1e15).map(|l| l.index), Some(1));
    }
}
