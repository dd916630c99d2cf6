use thiserror::Error;

/// Errors that can occur while planning a survey mission.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("survey region contains no polygon")]
    EmptyRegion,
    #[error("invalid region geometry: {0}")]
    Geometry(String),
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("no coverage produced: {0}")]
    NoCoverage(String),
}
