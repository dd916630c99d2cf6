//! Photogrammetric footprint and capture-spacing math.

use crate::error::PlanError;
use crate::models::{CameraParams, FlightParams};

/// Ground coverage of a single photo at a given altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoFootprint {
    /// Ground sample distance in meters per pixel.
    pub gsd_m: f64,
    /// Across-track extent in meters.
    pub width_m: f64,
    /// Along-track extent in meters.
    pub height_m: f64,
}

/// Capture spacing derived from footprint size and requested overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSpacing {
    /// Distance between consecutive photos on a line, meters.
    pub along_track_m: f64,
    /// Distance between adjacent flight lines, meters.
    pub side_track_m: f64,
}

/// Ground footprint of one photo taken straight down from `altitude_m`.
pub fn photo_footprint(
    altitude_m: f64,
    camera: &CameraParams,
) -> Result<PhotoFootprint, PlanError> {
    if !(altitude_m > 0.0) || !altitude_m.is_finite() {
        return Err(PlanError::InvalidParameters(format!(
            "altitude must be positive, got {altitude_m}"
        )));
    }
    if !(camera.sensor_width_mm > 0.0)
        || !(camera.sensor_height_mm > 0.0)
        || !(camera.focal_length_mm > 0.0)
        || camera.image_width_px == 0
        || camera.image_height_px == 0
    {
        return Err(PlanError::InvalidParameters(
            "camera sensor, focal length and image dimensions must be positive".to_string(),
        ));
    }

    let gsd_m = altitude_m * camera.sensor_width_mm
        / (camera.focal_length_mm * camera.image_width_px as f64);
    Ok(PhotoFootprint {
        gsd_m,
        width_m: gsd_m * camera.image_width_px as f64,
        height_m: gsd_m * camera.image_height_px as f64,
    })
}

/// Along-track and side-track spacing for the requested overlap.
///
/// Overlap at or above 100% would mean a zero or negative step, so it is
/// rejected rather than producing an endless line.
pub fn capture_spacing(
    flight: &FlightParams,
    camera: &CameraParams,
) -> Result<CaptureSpacing, PlanError> {
    if !(0.0..100.0).contains(&flight.front_overlap_pct) {
        return Err(PlanError::InvalidParameters(format!(
            "front overlap must be in [0, 100), got {}",
            flight.front_overlap_pct
        )));
    }
    if !(0.0..100.0).contains(&flight.side_overlap_pct) {
        return Err(PlanError::InvalidParameters(format!(
            "side overlap must be in [0, 100), got {}",
            flight.side_overlap_pct
        )));
    }
    let footprint = photo_footprint(flight.altitude_m, camera)?;

    let along_track_m = footprint.height_m * (1.0 - flight.front_overlap_pct / 100.0);
    let side_track_m = footprint.width_m * (1.0 - flight.side_overlap_pct / 100.0);

    if !along_track_m.is_finite() || !side_track_m.is_finite() {
        return Err(PlanError::InvalidParameters(
            "altitude and camera produce an unusable footprint".to_string(),
        ));
    }

    Ok(CaptureSpacing {
        along_track_m,
        side_track_m,
    })
}
