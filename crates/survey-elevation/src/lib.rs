//! survey-elevation - terrain elevation collection for survey plans.
//!
//! Defines the provider boundary for elevation services and the batched
//! collection flow that folds fetched elevation into waypoint altitudes.

pub mod fetch;
pub mod provider;

pub use fetch::{collect_elevations, correct_altitudes, DEFAULT_BATCH_SIZE};
pub use provider::{ElevationError, ElevationProvider};
