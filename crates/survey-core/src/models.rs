//! Shared data model for survey mission planning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How waypoint altitude values are interpreted by the flight controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AltitudeMode {
    /// Fixed height above the takeoff point.
    #[default]
    Relative,
    /// Per-waypoint height above ground, corrected with terrain elevation.
    Agl,
}

/// Flight configuration for a survey mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightParams {
    /// Height above the takeoff point in meters.
    pub altitude_m: f64,
    /// Overlap between consecutive photos along a line, percent in [0, 100).
    pub front_overlap_pct: f64,
    /// Overlap between adjacent flight lines, percent in [0, 100).
    pub side_overlap_pct: f64,
    pub speed_mps: f64,
    pub gimbal_pitch_deg: f64,
    /// Bearing the flight lines run along, degrees clockwise from north.
    pub flight_direction_deg: f64,
    pub altitude_mode: AltitudeMode,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            altitude_m: 100.0,
            front_overlap_pct: 80.0,
            side_overlap_pct: 70.0,
            speed_mps: 5.0,
            gimbal_pitch_deg: -90.0,
            flight_direction_deg: 0.0,
            altitude_mode: AltitudeMode::Relative,
        }
    }
}

/// Camera sensor geometry used for footprint and spacing math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub sensor_width_mm: f64,
    pub sensor_height_mm: f64,
    pub focal_length_mm: f64,
    pub image_width_px: u32,
    pub image_height_px: u32,
}

impl Default for CameraParams {
    /// 1-inch 20 MP sensor, the common mapping-drone configuration.
    fn default() -> Self {
        Self {
            sensor_width_mm: 13.2,
            sensor_height_mm: 8.8,
            focal_length_mm: 8.8,
            image_width_px: 5472,
            image_height_px: 3648,
        }
    }
}

/// A single capture position on a flight line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lon: f64,
    /// Meters; relative to takeoff, or above-ground once terrain-corrected.
    pub altitude_m: f64,
    /// Degrees clockwise from north, [0, 360).
    pub heading_deg: f64,
    pub gimbal_pitch_deg: f64,
    pub speed_mps: f64,
}

/// One sweep pass of the coverage path, waypoints in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLine {
    pub waypoints: Vec<Waypoint>,
}

/// Ground rectangle captured by one photo.
///
/// Stored as [lat, lon] pairs (closed ring - first == last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub ring: Vec<[f64; 2]>,
}

/// Edge-preserving decimation settings for display and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    pub enabled: bool,
    /// Waypoints kept from the start of each flight line.
    pub keep_start: usize,
    /// Waypoints kept from the end of each flight line.
    pub keep_end: usize,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            enabled: false,
            keep_start: 2,
            keep_end: 2,
        }
    }
}

/// Canonical output of one planning invocation.
///
/// Footprints align 1:1 with the flattened waypoint sequence. The plan is
/// replaced wholesale on re-planning; nothing updates it incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionPlan {
    pub lines: Vec<FlightLine>,
    pub footprints: Vec<Footprint>,
    pub planned_at: DateTime<Utc>,
}

impl MissionPlan {
    /// Total waypoint count across all flight lines.
    pub fn waypoint_count(&self) -> usize {
        self.lines.iter().map(|l| l.waypoints.len()).sum()
    }

    /// Waypoints in traversal order, concatenated across lines.
    pub fn flattened(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        self.lines.iter().flat_map(|l| l.waypoints.iter())
    }

    /// [lat, lon] per flattened waypoint, in order, for elevation lookup.
    pub fn sample_positions(&self) -> Vec<[f64; 2]> {
        self.flattened().map(|w| [w.lat, w.lon]).collect()
    }
}

/// Flattened waypoints and footprints after filtering, for display/export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionView {
    pub waypoints: Vec<Waypoint>,
    pub footprints: Vec<Footprint>,
}

impl MissionView {
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Summary figures for the active waypoint set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionStats {
    pub total_distance_km: f64,
    /// MM:SS, floored to the second.
    pub flight_time: String,
    pub photo_count: usize,
    /// Raw imagery volume in gigapixels.
    pub gigapixels: f64,
    pub flight_line_count: usize,
}
