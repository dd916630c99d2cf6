//! Edge-preserving waypoint decimation for display and export.

use crate::models::{FilterParams, MissionPlan, MissionView};

/// Derive the active view from the canonical plan.
///
/// Disabled filtering passes the flattened plan through unchanged. Enabled
/// filtering keeps the first `keep_start` and last `keep_end` waypoints of
/// each flight line, with their footprints, and drops the interior. The
/// canonical plan is never modified; call again after terrain correction to
/// pick up corrected altitudes.
pub fn apply_filter(plan: &MissionPlan, params: &FilterParams) -> MissionView {
    if !params.enabled {
        return MissionView {
            waypoints: plan.flattened().cloned().collect(),
            footprints: plan.footprints.clone(),
        };
    }

    let mut waypoints = Vec::new();
    let mut footprints = Vec::new();
    let mut offset = 0usize;
    for line in &plan.lines {
        let len = line.waypoints.len();
        for (i, wp) in line.waypoints.iter().enumerate() {
            if keep_index(i, len, params.keep_start, params.keep_end) {
                waypoints.push(wp.clone());
                if let Some(fp) = plan.footprints.get(offset + i) {
                    footprints.push(fp.clone());
                }
            }
        }
        offset += len;
    }

    MissionView {
        waypoints,
        footprints,
    }
}

/// Whether position `i` of a line of length `len` survives filtering.
fn keep_index(i: usize, len: usize, keep_start: usize, keep_end: usize) -> bool {
    if len <= keep_start.saturating_add(keep_end) {
        return true;
    }
    i < keep_start || i >= len - keep_end
}
