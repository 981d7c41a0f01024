/// Error types for the camera module.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CameraError {
    /// A sensor dimension, resolution, scale, lens or pixel aspect is not strictly positive.
    #[error("Invalid sensor configuration: {0}")]
    InvalidSensorConfiguration(String),

    /// The camera orientation is not a proper rotation.
    #[error("Invalid orientation: {0}")]
    InvalidOrientation(String),

    /// The camera location contains NaN or infinite values.
    #[error("Camera location must be finite, got {0:?}")]
    NonFiniteLocation([f64; 3]),

    /// A flat buffer does not hold the number of values the matrix needs.
    #[error("Dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch {
        /// Number of values the target shape requires.
        expected: usize,
        /// Number of values provided.
        actual: usize,
    },

    /// The intrinsic matrix is not of pinhole form.
    #[error("Invalid camera intrinsics: {0}")]
    InvalidIntrinsics(String),
}
