//! Provider boundary for terrain elevation lookups.

use async_trait::async_trait;
use thiserror::Error;

/// Errors an elevation provider can report for one batch.
#[derive(Error, Debug)]
pub enum ElevationError {
    #[error("elevation provider failed: {0}")]
    Provider(String),
    #[error("elevation provider returned {got} samples, expected {expected}")]
    SampleCount { expected: usize, got: usize },
}

/// Source of terrain elevation for ordered position lists.
///
/// Implementations answer with one sample per input position, in input
/// order, using `None` for positions they cannot resolve. Positions are
/// [lat, lon] in decimal degrees.
#[async_trait]
pub trait ElevationProvider: Send + Sync {
    async fn elevations(&self, positions: &[[f64; 2]]) -> Result<Vec<Option<f64>>, ElevationError>;
}
