use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TrackError {
    #[error("sample {index} at {timestamp} ms precedes previous sample at {previous} ms")]
    OutOfOrder {
        index: usize,
        previous: f64,
        timestamp: f64,
    },
}
