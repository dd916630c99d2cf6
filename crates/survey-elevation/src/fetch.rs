//! Batched elevation collection and altitude correction.

use survey_core::{apply_elevations, FlightParams, MissionPlan, TerrainMerge};

use crate::provider::{ElevationError, ElevationProvider};

/// Positions sent to the provider per request.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Collect one elevation sample per position, in bounded batches.
///
/// Batches are issued one at a time, never concurrently, to respect
/// provider request-size limits. A batch that fails or answers with the
/// wrong sample count degrades to `None` for its positions; later batches
/// still run.
pub async fn collect_elevations(
    provider: &dyn ElevationProvider,
    positions: &[[f64; 2]],
    batch_size: usize,
) -> Vec<Option<f64>> {
    let total = positions.len();
    let batch_size = batch_size.max(1);
    let mut samples: Vec<Option<f64>> = Vec::with_capacity(total);

    let mut start = 0usize;
    while start < total {
        let end = (start + batch_size).min(total);
        let batch = &positions[start..end];
        tracing::debug!("requesting elevations {}..{} of {}", start, end, total);
        match provider.elevations(batch).await {
            Ok(chunk) if chunk.len() == batch.len() => samples.extend(chunk),
            Ok(chunk) => {
                tracing::warn!(
                    "elevation batch returned {} samples, expected {}; marking batch unknown",
                    chunk.len(),
                    batch.len()
                );
                samples.resize(end, None);
            }
            Err(err) => {
                tracing::warn!("elevation batch failed: {err}; marking batch unknown");
                samples.resize(end, None);
            }
        }
        start = end;
    }
    samples
}

/// Fetch elevation for every waypoint of `plan` and fold it into altitudes.
///
/// Works on the canonical plan only; derive filtered views from the
/// returned plan afterwards.
pub async fn correct_altitudes(
    provider: &dyn ElevationProvider,
    plan: &MissionPlan,
    flight: &FlightParams,
    batch_size: usize,
) -> TerrainMerge {
    let positions = plan.sample_positions();
    let samples = collect_elevations(provider, &positions, batch_size).await;
    let merge = apply_elevations(plan, &samples, flight.altitude_m);
    tracing::info!(
        "terrain correction applied: {} corrected, {} unknown",
        merge.corrected,
        merge.unknown
    );
    merge
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use survey_core::{FlightLine, Waypoint};

    /// Echoes each position's latitude back as its elevation.
    struct EchoLat {
        calls: AtomicUsize,
    }

    impl EchoLat {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ElevationProvider for EchoLat {
        async fn elevations(
            &self,
            positions: &[[f64; 2]],
        ) -> Result<Vec<Option<f64>>, ElevationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(positions.iter().map(|p| Some(p[0])).collect())
        }
    }

    /// Fails one batch by index, succeeds on the rest.
    struct FailsBatch {
        fail_index: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ElevationProvider for FailsBatch {
        async fn elevations(
            &self,
            positions: &[[f64; 2]],
        ) -> Result<Vec<Option<f64>>, ElevationError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            if index == self.fail_index {
                return Err(ElevationError::Provider("upstream timeout".to_string()));
            }
            Ok(positions.iter().map(|_| Some(7.0)).collect())
        }
    }

    /// Always answers with a single sample regardless of batch size.
    struct WrongCount;

    #[async_trait]
    impl ElevationProvider for WrongCount {
        async fn elevations(
            &self,
            _positions: &[[f64; 2]],
        ) -> Result<Vec<Option<f64>>, ElevationError> {
            Ok(vec![Some(1.0)])
        }
    }

    /// Reports the mismatch as an error instead of a short answer.
    struct CountError;

    #[async_trait]
    impl ElevationProvider for CountError {
        async fn elevations(
            &self,
            positions: &[[f64; 2]],
        ) -> Result<Vec<Option<f64>>, ElevationError> {
            Err(ElevationError::SampleCount {
                expected: positions.len(),
                got: 0,
            })
        }
    }

    fn positions(count: usize) -> Vec<[f64; 2]> {
        (0..count).map(|i| [i as f64, -117.0]).collect()
    }

    fn small_plan() -> MissionPlan {
        let wp = |lat: f64, lon: f64| Waypoint {
            lat,
            lon,
            altitude_m: 100.0,
            heading_deg: 90.0,
            gimbal_pitch_deg: -90.0,
            speed_mps: 5.0,
        };
        MissionPlan {
            lines: vec![
                FlightLine {
                    waypoints: vec![wp(33.0, -117.0), wp(33.0, -116.999)],
                },
                FlightLine {
                    waypoints: vec![wp(33.001, -116.999), wp(33.001, -117.0)],
                },
            ],
            footprints: Vec::new(),
            planned_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn batches_preserve_position_order() {
        let provider = EchoLat::new();
        let samples = collect_elevations(&provider, &positions(120), DEFAULT_BATCH_SIZE).await;

        assert_eq!(samples.len(), 120);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(*sample, Some(i as f64));
        }
    }

    #[tokio::test]
    async fn failed_batch_degrades_without_stopping_later_batches() {
        let provider = FailsBatch {
            fail_index: 1,
            calls: AtomicUsize::new(0),
        };
        let samples = collect_elevations(&provider, &positions(120), 50).await;

        assert_eq!(samples.len(), 120);
        assert!(samples[..50].iter().all(|s| s.is_some()));
        assert!(samples[50..100].iter().all(|s| s.is_none()));
        assert!(samples[100..].iter().all(|s| s.is_some()));
    }

    #[tokio::test]
    async fn wrong_sample_count_marks_batch_unknown() {
        let samples = collect_elevations(&WrongCount, &positions(10), 5).await;
        assert_eq!(samples.len(), 10);
        assert!(samples.iter().all(|s| s.is_none()));
    }

    #[tokio::test]
    async fn sample_count_error_marks_batch_unknown() {
        let samples = collect_elevations(&CountError, &positions(4), 2).await;
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| s.is_none()));
    }

    #[tokio::test]
    async fn zero_batch_size_is_clamped() {
        let provider = EchoLat::new();
        let samples = collect_elevations(&provider, &positions(3), 0).await;

        assert_eq!(samples.len(), 3);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn correct_altitudes_folds_samples_into_plan() {
        let provider = EchoLat::new();
        let plan = small_plan();
        let flight = FlightParams::default();
        let merge = correct_altitudes(&provider, &plan, &flight, DEFAULT_BATCH_SIZE).await;

        assert_eq!(merge.corrected, 4);
        assert_eq!(merge.unknown, 0);
        // Elevation echoes latitude, so altitude is lat + 100 rounded.
        let altitudes: Vec<f64> = merge.plan.flattened().map(|w| w.altitude_m).collect();
        assert_eq!(altitudes, vec![133.0, 133.0, 133.0, 133.0]);
        assert!(plan.flattened().all(|w| w.altitude_m == 100.0));
    }
}
