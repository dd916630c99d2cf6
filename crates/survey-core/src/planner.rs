//! Boustrophedon coverage planning over a survey region.
//!
//! The sweep itself is axis-aligned. The region is rotated so the requested
//! flight bearing lies horizontal, then horizontal rows are clipped to the
//! boundary and paired into segments. Points are rotated back before
//! headings and footprints are computed in true geographic space.

use std::cmp::Ordering;

use chrono::Utc;
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{
    Area, BooleanOps, BoundingRect, Centroid, Coord, Geometry, Line, MapCoords, MultiPolygon,
    Polygon,
};

use crate::error::PlanError;
use crate::models::{CameraParams, FlightLine, FlightParams, Footprint, MissionPlan, Waypoint};
use crate::photogrammetry::{capture_spacing, photo_footprint, PhotoFootprint};
use crate::spatial;

/// Trailing step shorter than this merges into the line endpoint.
const ENDPOINT_MERGE_M: f64 = 1.0;
/// Tolerance for collapsing duplicate intersections when a row hits a vertex.
const INTERSECTION_EPS_DEG: f64 = 1e-9;
/// Keeps the top row when float error lands it just past the bounding box.
const ROW_EPS_DEG: f64 = 1e-12;

/// One swept segment in rotated space: a horizontal run at `y_deg`.
#[derive(Debug, Clone, Copy)]
struct Backbone {
    y_deg: f64,
    x_start_deg: f64,
    x_end_deg: f64,
}

/// Merge input polygon features into the single region to sweep.
pub fn normalize_region(features: &[Geometry<f64>]) -> Result<MultiPolygon<f64>, PlanError> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    for feature in features {
        match feature {
            Geometry::Polygon(p) => polygons.push(p.clone()),
            Geometry::MultiPolygon(mp) => polygons.extend(mp.0.iter().cloned()),
            _ => {}
        }
    }
    if polygons.is_empty() {
        return Err(PlanError::EmptyRegion);
    }
    for polygon in &polygons {
        validate_polygon(polygon)?;
    }

    let mut region = MultiPolygon::new(vec![polygons[0].clone()]);
    for polygon in polygons.iter().skip(1) {
        region = region.union(&MultiPolygon::new(vec![polygon.clone()]));
    }
    if region.0.is_empty() || region.unsigned_area() <= 0.0 {
        return Err(PlanError::Geometry(
            "region has no area after union".to_string(),
        ));
    }
    Ok(region)
}

fn validate_polygon(polygon: &Polygon<f64>) -> Result<(), PlanError> {
    let exterior = polygon.exterior();
    if exterior.0.len() < 4 {
        return Err(PlanError::Geometry(format!(
            "polygon ring needs at least 4 points, got {}",
            exterior.0.len()
        )));
    }
    let interior_coords = polygon.interiors().iter().flat_map(|r| r.0.iter());
    for c in exterior.0.iter().chain(interior_coords) {
        if !c.x.is_finite() || !c.y.is_finite() {
            return Err(PlanError::Geometry(
                "polygon contains non-finite coordinates".to_string(),
            ));
        }
    }
    Ok(())
}

fn is_zero_rotation(angle_deg: f64) -> bool {
    let a = angle_deg.rem_euclid(360.0);
    a <= 1e-12 || a >= 360.0 - 1e-12
}

fn rotate_region(
    region: &MultiPolygon<f64>,
    pivot_lat: f64,
    pivot_lon: f64,
    angle_deg: f64,
) -> MultiPolygon<f64> {
    if is_zero_rotation(angle_deg) {
        return region.clone();
    }
    region.map_coords(|c| {
        let (lat, lon) = spatial::rotate_point(c.y, c.x, pivot_lat, pivot_lon, angle_deg);
        Coord { x: lon, y: lat }
    })
}

/// Sweep horizontal rows across the rotated region, clipped to its boundary.
///
/// Intersections on each row are sorted by x and paired off consecutively,
/// so concave and multi-part regions yield one backbone per inside interval
/// and the gaps between parts are skipped.
fn sweep_backbones(region: &MultiPolygon<f64>, step_deg: f64) -> Vec<Backbone> {
    let Some(bbox) = region.bounding_rect() else {
        return Vec::new();
    };
    let (min, max) = (bbox.min(), bbox.max());

    let mut edges: Vec<Line<f64>> = Vec::new();
    for polygon in &region.0 {
        edges.extend(polygon.exterior().lines());
        for ring in polygon.interiors() {
            edges.extend(ring.lines());
        }
    }

    // Rows only need to span past the bounding box; the row spacing is a
    // convenient positive pad.
    let x_pad = step_deg;
    let mut backbones = Vec::new();
    let mut y = min.y;
    while y <= max.y + ROW_EPS_DEG {
        let row = Line::new(
            Coord {
                x: min.x - x_pad,
                y,
            },
            Coord {
                x: max.x + x_pad,
                y,
            },
        );
        let mut xs = row_intersections(&row, &edges);
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        xs.dedup_by(|a, b| (*a - *b).abs() <= INTERSECTION_EPS_DEG);
        // A row that grazes a vertex can leave an odd count; the unpaired
        // point is dropped, losing at most a sliver on tangent rows.
        for pair in xs.chunks_exact(2) {
            backbones.push(Backbone {
                y_deg: y,
                x_start_deg: pair[0],
                x_end_deg: pair[1],
            });
        }
        y += step_deg;
    }
    backbones
}

fn row_intersections(row: &Line<f64>, edges: &[Line<f64>]) -> Vec<f64> {
    let mut xs = Vec::new();
    for edge in edges {
        match line_intersection(*row, *edge) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => xs.push(intersection.x),
            Some(LineIntersection::Collinear { intersection }) => {
                xs.push(intersection.start.x);
                xs.push(intersection.end.x);
            }
            None => {}
        }
    }
    xs
}

/// Points along a backbone every `along_track_m`, endpoint always included.
fn place_along(backbone: &Backbone, along_track_m: f64) -> Vec<Coord<f64>> {
    let length_m =
        spatial::lon_to_meters(backbone.x_end_deg - backbone.x_start_deg, backbone.y_deg);
    if length_m <= f64::EPSILON {
        return vec![Coord {
            x: backbone.x_start_deg,
            y: backbone.y_deg,
        }];
    }

    let step_deg = spatial::meters_to_lon(along_track_m, backbone.y_deg);
    let steps = (length_m / along_track_m).floor() as usize;

    let mut points = Vec::with_capacity(steps + 2);
    for i in 0..=steps {
        points.push(Coord {
            x: backbone.x_start_deg + i as f64 * step_deg,
            y: backbone.y_deg,
        });
    }

    let end = Coord {
        x: backbone.x_end_deg,
        y: backbone.y_deg,
    };
    let trailing_m = length_m - steps as f64 * along_track_m;
    if trailing_m <= ENDPOINT_MERGE_M {
        if let Some(last) = points.last_mut() {
            *last = end;
        }
    } else {
        points.push(end);
    }
    points
}

/// Rotate sweep points back to true geographic space and attach headings.
///
/// Heading of each waypoint is the bearing to its successor; the last point
/// looks back at its predecessor and flips. A single-point line falls back
/// to the nominal sweep bearing for its parity.
fn to_waypoints(
    points: &[Coord<f64>],
    pivot_lat: f64,
    pivot_lon: f64,
    back_angle_deg: f64,
    nominal_heading_deg: f64,
    flight: &FlightParams,
) -> Vec<Waypoint> {
    let rotate_back = !is_zero_rotation(back_angle_deg);
    let positions: Vec<(f64, f64)> = points
        .iter()
        .map(|c| {
            if rotate_back {
                spatial::rotate_point(c.y, c.x, pivot_lat, pivot_lon, back_angle_deg)
            } else {
                (c.y, c.x)
            }
        })
        .collect();

    let last = positions.len().saturating_sub(1);
    positions
        .iter()
        .enumerate()
        .map(|(i, &(lat, lon))| {
            let heading_deg = if positions.len() < 2 {
                spatial::normalize_bearing(nominal_heading_deg)
            } else if i < last {
                let (next_lat, next_lon) = positions[i + 1];
                spatial::bearing_deg(lat, lon, next_lat, next_lon)
            } else {
                let (prev_lat, prev_lon) = positions[i - 1];
                let back = spatial::bearing_deg(lat, lon, prev_lat, prev_lon);
                spatial::normalize_bearing(back + 180.0)
            };
            Waypoint {
                lat,
                lon,
                altitude_m: flight.altitude_m,
                heading_deg,
                gimbal_pitch_deg: flight.gimbal_pitch_deg,
                speed_mps: flight.speed_mps,
            }
        })
        .collect()
}

/// Four-corner ground rectangle centered on the waypoint, aligned to heading.
fn capture_footprint(wp: &Waypoint, footprint: &PhotoFootprint) -> Footprint {
    let half_h = footprint.height_m / 2.0;
    let half_w = footprint.width_m / 2.0;
    let heading = wp.heading_deg;

    let front = spatial::destination(wp.lat, wp.lon, heading, half_h);
    let back = spatial::destination(wp.lat, wp.lon, heading + 180.0, half_h);

    let front_left = spatial::destination(front.0, front.1, heading - 90.0, half_w);
    let front_right = spatial::destination(front.0, front.1, heading + 90.0, half_w);
    let back_right = spatial::destination(back.0, back.1, heading + 90.0, half_w);
    let back_left = spatial::destination(back.0, back.1, heading - 90.0, half_w);

    Footprint {
        ring: vec![
            [front_left.0, front_left.1],
            [front_right.0, front_right.1],
            [back_right.0, back_right.1],
            [back_left.0, back_left.1],
            [front_left.0, front_left.1],
        ],
    }
}

/// Plan a full coverage mission over `features`.
///
/// The normalized region is swept with lines along the requested flight
/// direction at the overlap-derived spacing. Each capture point carries the
/// flight parameters plus one ground footprint, and traversal alternates
/// direction line to line.
pub fn plan_mission(
    features: &[Geometry<f64>],
    flight: &FlightParams,
    camera: &CameraParams,
) -> Result<MissionPlan, PlanError> {
    let footprint = photo_footprint(flight.altitude_m, camera)?;
    let spacing = capture_spacing(flight, camera)?;
    let region = normalize_region(features)?;

    let centroid = region
        .centroid()
        .ok_or_else(|| PlanError::Geometry("region centroid is undefined".to_string()))?;
    let (pivot_lat, pivot_lon) = (centroid.y(), centroid.x());

    // Lay the requested bearing horizontal, sweep, then rotate back.
    let forward_deg = 90.0 - flight.flight_direction_deg;
    let rotated = rotate_region(&region, pivot_lat, pivot_lon, forward_deg);

    let step_deg = spatial::meters_to_lat(spacing.side_track_m, pivot_lat);
    let backbones = sweep_backbones(&rotated, step_deg);
    if backbones.is_empty() {
        return Err(PlanError::NoCoverage(
            "region is too small for the side-track spacing".to_string(),
        ));
    }

    let back_deg = flight.flight_direction_deg - 90.0;
    let mut lines = Vec::with_capacity(backbones.len());
    for (index, backbone) in backbones.iter().enumerate() {
        let mut points = place_along(backbone, spacing.along_track_m);
        let reversed = index % 2 == 1;
        if reversed {
            points.reverse();
        }
        let nominal = if reversed {
            flight.flight_direction_deg + 180.0
        } else {
            flight.flight_direction_deg
        };
        let waypoints = to_waypoints(&points, pivot_lat, pivot_lon, back_deg, nominal, flight);
        lines.push(FlightLine { waypoints });
    }

    let total: usize = lines.iter().map(|l| l.waypoints.len()).sum();
    if total == 0 {
        return Err(PlanError::NoCoverage(
            "no waypoints were generated".to_string(),
        ));
    }

    let footprints = lines
        .iter()
        .flat_map(|l| l.waypoints.iter())
        .map(|wp| capture_footprint(wp, &footprint))
        .collect();

    Ok(MissionPlan {
        lines,
        footprints,
        planned_at: Utc::now(),
    })
}
