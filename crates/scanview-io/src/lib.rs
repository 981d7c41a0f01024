#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Calibration rig reader.
pub mod calibration;

/// Error types for the rig and export files.
pub mod error;

/// Camera matrix export files.
pub mod export;

pub use calibration::{read_camera_rig, CameraRig, RigCamera};
pub use error::RigError;
pub use export::{read_camera_exports, write_camera_exports, CameraExport};
