//! Merging fetched terrain elevation into waypoint altitudes.

use crate::models::MissionPlan;

/// Outcome of merging elevation samples into a plan.
#[derive(Debug, Clone)]
pub struct TerrainMerge {
    pub plan: MissionPlan,
    /// Waypoints whose altitude was corrected with a known elevation.
    pub corrected: usize,
    /// Waypoints left at their original altitude for lack of a sample.
    pub unknown: usize,
}

/// Apply per-waypoint elevation samples to the canonical plan.
///
/// Samples align by position with the flattened waypoint sequence. A known
/// elevation sets the waypoint altitude to `elevation + flight_altitude_m`,
/// rounded to centimeters; a missing or non-finite sample leaves the original
/// altitude in place. The input plan is untouched, so filtered views can be
/// re-derived from the returned plan afterwards.
pub fn apply_elevations(
    plan: &MissionPlan,
    samples: &[Option<f64>],
    flight_altitude_m: f64,
) -> TerrainMerge {
    let mut merged = plan.clone();
    let mut corrected = 0usize;
    let mut unknown = 0usize;

    let mut index = 0usize;
    for line in &mut merged.lines {
        for wp in &mut line.waypoints {
            match samples.get(index).copied().flatten() {
                Some(elevation) if elevation.is_finite() => {
                    wp.altitude_m = round2(elevation + flight_altitude_m);
                    corrected += 1;
                }
                _ => unknown += 1,
            }
            index += 1;
        }
    }

    TerrainMerge {
        plan: merged,
        corrected,
        unknown,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
