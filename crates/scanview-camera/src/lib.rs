#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Scanview camera
//!
//! Converts the camera of a 3D authoring tool (lens, sensor, render resolution, lens shift
//! and the world transform of the camera node) into a pinhole camera model and back.
//!
//! - **Intrinsics**: the 3x3 matrix K, see [`intrinsics()`].
//! - **Extrinsics**: the 3x4 matrix `[R | T]` from world to the computer-vision camera
//!   frame (x right, y down, z forward), see [`extrinsics()`].
//! - **Projection**: `P = K * [R | T]`, see [`projection()`].
//! - **Installation**: turn a pinhole pose or intrinsic matrix back into scene camera
//!   settings, see [`install_pose`], [`pose_from_extrinsics`] and
//!   [`SceneCamera::from_intrinsics`].
//!
//! ## Example
//!
//! ```rust
//! use scanview_camera::{AuthoringToolToCv, PrincipalPointMode, SceneCamera};
//!
//! let convention = AuthoringToolToCv::BLENDER;
//! let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
//!
//! // a rig camera two and a half units in front of the origin
//! let pose = convention.calibration_pose(&identity, [0.0, 0.0, -2.5])?;
//! let camera = SceneCamera::default().with_pose(pose);
//!
//! let m = camera.matrices(PrincipalPointMode::Centered, &convention)?;
//! let uv = m.p.project(&[0.0, 0.0, 0.0]).unwrap();
//! assert!((uv[0] - m.k.u0).abs() < 1e-9);
//! # Ok::<(), scanview_camera::CameraError>(())
//! ```

/// Axis conventions of the authoring tool.
pub mod convention;

/// Error types for the camera module.
pub mod error;

/// Extrinsic matrix derivation.
pub mod extrinsics;

/// Pose and intrinsics installation.
pub mod install;

/// Intrinsic matrix derivation.
pub mod intrinsics;

/// Projection matrix composition and point projection.
pub mod projection;

/// Rotation representations of the camera node.
pub mod rotation;

/// Scene camera settings.
pub mod scene;

pub use convention::AuthoringToolToCv;
pub use error::CameraError;
pub use extrinsics::{extrinsics, Extrinsics};
pub use install::{install_pose, pose_from_extrinsics};
pub use intrinsics::{intrinsics, Intrinsics, PrincipalPointMode};
pub use projection::{projection, CameraMatrices, ProjectionMatrix};
pub use rotation::{Orientation, ScenePose, ORIENTATION_TOLERANCE};
pub use scene::{ImageSize, LensShift, PixelAspect, SceneCamera, SensorFit};
