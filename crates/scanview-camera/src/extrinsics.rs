use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};

use crate::convention::AuthoringToolToCv;
use crate::error::CameraError;
use crate::rotation::{check_rotation, mat3_from_rows, mat3_to_rows, ScenePose};

/// Rigid transform from world coordinates to the computer-vision camera frame, `[R | T]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extrinsics {
    /// World-to-camera rotation, row-major.
    pub rotation: [[f64; 3]; 3],
    /// World-to-camera translation.
    pub translation: [f64; 3],
}

impl Extrinsics {
    /// Create extrinsics from a rotation and a translation.
    ///
    /// # Errors
    ///
    /// [`CameraError::InvalidOrientation`] if `rotation` is not a proper rotation.
    pub fn new(rotation: [[f64; 3]; 3], translation: [f64; 3]) -> Result<Self, CameraError> {
        check_rotation(&mat3_from_rows(&rotation), "extrinsic rotation")?;
        if !translation.iter().all(|t| t.is_finite()) {
            return Err(CameraError::NonFiniteLocation(translation));
        }
        Ok(Self {
            rotation,
            translation,
        })
    }

    /// The 3x4 matrix `[R | T]`, row-major.
    pub fn matrix(&self) -> [[f64; 4]; 3] {
        let mut rt = [[0.0; 4]; 3];
        for (row, (r, t)) in rt
            .iter_mut()
            .zip(self.rotation.iter().zip(self.translation.iter()))
        {
            row[..3].copy_from_slice(r);
            row[3] = *t;
        }
        rt
    }

    /// Split a 3x4 `[R | T]` matrix into extrinsics.
    pub fn from_matrix(rt: &[[f64; 4]; 3]) -> Result<Self, CameraError> {
        let rotation = [
            [rt[0][0], rt[0][1], rt[0][2]],
            [rt[1][0], rt[1][1], rt[1][2]],
            [rt[2][0], rt[2][1], rt[2][2]],
        ];
        let translation = [rt[0][3], rt[1][3], rt[2][3]];
        Self::new(rotation, translation)
    }

    /// Camera centre in world coordinates, `-R^T * T`.
    pub fn camera_center(&self) -> [f64; 3] {
        let (r, t) = self.to_glam();
        (-(r.transpose() * t)).to_array()
    }

    /// Map a world point into the camera frame.
    pub fn transform_point(&self, point: &[f64; 3]) -> [f64; 3] {
        let (r, t) = self.to_glam();
        (r * DVec3::from_array(*point) + t).to_array()
    }

    pub(crate) fn to_glam(self) -> (DMat3, DVec3) {
        (
            mat3_from_rows(&self.rotation),
            DVec3::from_array(self.translation),
        )
    }
}

/// Compute the extrinsic matrix RT of a camera node.
///
/// The node's object-to-world rotation is inverted into a world-to-camera rotation and then
/// changed into the computer-vision camera basis of `convention`.
///
/// # Arguments
///
/// * `pose` - World transform of the camera node.
/// * `convention` - Supplies the camera basis change `B`.
///
/// # Returns
///
/// `R = B * O^T` and `T = -B * O^T * location`, where `O` is the node orientation.
///
/// # Errors
///
/// [`CameraError::InvalidOrientation`] if the orientation is not a proper rotation and
/// [`CameraError::NonFiniteLocation`] if the location is not finite.
pub fn extrinsics(
    pose: &ScenePose,
    convention: &AuthoringToolToCv,
) -> Result<Extrinsics, CameraError> {
    let location = pose.location_vec()?;
    let orientation = pose.orientation.to_mat3()?;
    let basis = convention.basis()?;

    // object rotation -> coordinate rotation
    let r_world2tool = orientation.transpose();
    let t_world2tool = -(r_world2tool * location);

    let r_world2cv = basis * r_world2tool;
    let t_world2cv = basis * t_world2tool;

    let rt = Extrinsics {
        rotation: mat3_to_rows(&r_world2cv),
        translation: t_world2cv.to_array(),
    };
    log::debug!("extrinsics: {:?}", rt);

    Ok(rt)
}
