//! Axis conventions between the authoring tool and computer vision.
//!
//! Three coordinate systems are involved:
//!
//! 1. World coordinates: right-handed.
//! 2. Authoring-tool camera coordinates: x right, y up, the camera looks down -z.
//! 3. Computer-vision camera coordinates: x right, y down (aligned with pixel rows), the
//!    camera looks down +z.
//!
//! Every sign flip that maps one onto the other lives in [`AuthoringToolToCv`].

use glam::DMat3;
use serde::{Deserialize, Serialize};

use crate::error::CameraError;
use crate::install::install_pose;
use crate::rotation::{check_rotation, mat3_from_rows, mat3_to_rows, ScenePose};

/// Convention-correction constants for one authoring tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuthoringToolToCv {
    /// Basis change from tool camera axes to CV camera axes, row-major.
    pub camera_basis: [[f64; 3]; 3],
    /// Right-multiplied onto rotations read from external calibration files, row-major.
    pub calibration_correction: [[f64; 3]; 3],
    /// Sign applied to the horizontal lens shift when computing `u0`.
    pub shift_sign_x: f64,
    /// Sign applied to the vertical lens shift when computing `v0`.
    pub shift_sign_y: f64,
}

impl AuthoringToolToCv {
    /// Blender: flip y and z for the camera basis, 180 degrees about x for calibration
    /// rotations, inverted horizontal shift. The vertical shift is a fraction of the width.
    pub const BLENDER: Self = Self {
        camera_basis: [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]],
        calibration_correction: [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]],
        shift_sign_x: -1.0,
        shift_sign_y: 1.0,
    };

    pub(crate) fn basis(&self) -> Result<DMat3, CameraError> {
        let basis = mat3_from_rows(&self.camera_basis);
        check_rotation(&basis, "camera basis")?;
        Ok(basis)
    }

    pub(crate) fn correction(&self) -> Result<DMat3, CameraError> {
        let correction = mat3_from_rows(&self.calibration_correction);
        check_rotation(&correction, "calibration correction")?;
        Ok(correction)
    }

    pub(crate) fn check_shift_signs(&self) -> Result<(), CameraError> {
        for sign in [self.shift_sign_x, self.shift_sign_y] {
            if !sign.is_finite() || sign == 0.0 {
                return Err(CameraError::InvalidSensorConfiguration(format!(
                    "lens shift sign must be non-zero, got {sign}"
                )));
            }
        }
        Ok(())
    }

    /// Build the scene pose for a camera stored in an external calibration file.
    ///
    /// The stored rotation is corrected by [`Self::calibration_correction`] before it is
    /// installed, the translation is used as the camera location as-is.
    ///
    /// # Arguments
    ///
    /// * `rotation` - The stored rotation, row-major.
    /// * `translation` - The stored translation.
    pub fn calibration_pose(
        &self,
        rotation: &[[f64; 3]; 3],
        translation: [f64; 3],
    ) -> Result<ScenePose, CameraError> {
        let stored = mat3_from_rows(rotation);
        check_rotation(&stored, "calibration rotation")?;
        let corrected = stored * self.correction()?;
        install_pose(translation, &mat3_to_rows(&corrected))
    }
}

impl Default for AuthoringToolToCv {
    fn default() -> Self {
        Self::BLENDER
    }
}
