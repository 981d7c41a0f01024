use scanview_camera::CameraError;

/// Error types for the rig and export files.
#[derive(Debug, thiserror::Error)]
pub enum RigError {
    /// Error reading or writing file
    #[error("error reading or writing file")]
    Io(#[from] std::io::Error),

    /// Malformed JSON document
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A rig record does not describe a valid camera
    #[error(transparent)]
    Camera(#[from] CameraError),

    /// The rig has no cameras
    #[error("the calibration rig has no cameras")]
    EmptyRig,
}
