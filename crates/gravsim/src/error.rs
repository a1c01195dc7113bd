//! Error type shared by every fallible operation in the crate

use thiserror::Error;

use crate::body::BodyId;

/// Errors raised by body construction, configuration and stepping
///
/// Geometry degeneracies (zero separation, zero displacement) never show up
/// here; they are absorbed by epsilon floors where they occur.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("body mass must be positive and finite, got {0}")]
    InvalidMass(f64),

    #[error("body density must be positive and finite, got {0}")]
    InvalidDensity(f64),

    #[error("body position must be finite, got ({0}, {1})")]
    InvalidPosition(f64, f64),

    #[error("body velocity must be finite, got speed {0} at direction {1}")]
    InvalidVelocity(f64, f64),

    #[error("time scale must be non-negative and finite, got {0}")]
    NegativeTimeScale(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("no body with id {}", .0.0)]
    UnknownBody(BodyId),
}

pub type Result<T> = std::result::Result<T, SimError>;
