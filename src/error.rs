use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    /// The input pair maps to a singular or undefined point of the projection.
    #[error("Point ({x}, {y}) is outside the projection domain")]
    OutsideDomain { x: f64, y: f64 },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

impl ProjError {
    pub fn is_outside_domain(&self) -> bool {
        matches!(self, ProjError::OutsideDomain { .. })
    }
}
