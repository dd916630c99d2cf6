pub mod error;
pub mod filter;
pub mod models;
pub mod photogrammetry;
pub mod planner;
pub mod spatial;
pub mod stats;
pub mod terrain;

pub use error::PlanError;
pub use filter::apply_filter;
pub use models::{
    AltitudeMode, CameraParams, FilterParams, FlightLine, FlightParams, Footprint, MissionPlan,
    MissionStats, MissionView, Waypoint,
};
pub use photogrammetry::{capture_spacing, photo_footprint, CaptureSpacing, PhotoFootprint};
pub use planner::{normalize_region, plan_mission};
pub use spatial::haversine_distance;
pub use stats::mission_stats;
pub use terrain::{apply_elevations, TerrainMerge};
