//! Mission summary statistics.

use crate::models::{CameraParams, FlightParams, MissionPlan, MissionStats, MissionView};
use crate::spatial;

/// Compute summary figures for the active waypoint set.
///
/// Returns `None` when there is nothing to summarize: an empty view, a plan
/// with no flight lines, or a non-positive speed.
pub fn mission_stats(
    view: &MissionView,
    plan: &MissionPlan,
    flight: &FlightParams,
    camera: &CameraParams,
) -> Option<MissionStats> {
    if view.is_empty() || plan.lines.is_empty() {
        return None;
    }
    if !(flight.speed_mps > 0.0) || !flight.speed_mps.is_finite() {
        return None;
    }

    let mut total_m = 0.0;
    for pair in view.waypoints.windows(2) {
        total_m += spatial::haversine_distance(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon);
    }

    let seconds = (total_m / flight.speed_mps).floor() as u64;
    let flight_time = format!("{:02}:{:02}", seconds / 60, seconds % 60);

    let photo_count = view.waypoints.len();
    let pixels = photo_count as f64 * camera.image_width_px as f64 * camera.image_height_px as f64;

    Some(MissionStats {
        total_distance_km: round2(total_m / 1000.0),
        flight_time,
        photo_count,
        gigapixels: round2(pixels / 1e9),
        flight_line_count: plan.lines.len(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
