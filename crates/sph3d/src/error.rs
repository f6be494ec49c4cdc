//! Error type for simulation setup and stepping.

use thiserror::Error;

/// Errors raised by the SPH core.
///
/// Numerical edge cases (coincident particles, negative pressure, particles resting
/// exactly on a wall) are handled inside the stages and never surface here.
#[derive(Debug, Error)]
pub enum SphError {
    /// Rejected configuration. Raised at initialization only.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Boundary geometry that cannot be collided against.
    #[error("degenerate boundary: {0}")]
    DegenerateBoundary(String),

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SphError>;

impl SphError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SphError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn boundary(msg: impl Into<String>) -> Self {
        SphError::DegenerateBoundary(msg.into())
    }
}
