use glam::{DMat3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Maximum deviation from unit norm / orthonormality accepted for an orientation.
pub const ORIENTATION_TOLERANCE: f64 = 1e-5;

/// Object-to-world rotation of a camera node.
///
/// Matrices are stored row-major, quaternions as `(w, x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Orientation {
    /// Unit quaternion.
    Quaternion {
        /// Real part.
        w: f64,
        /// i component.
        x: f64,
        /// j component.
        y: f64,
        /// k component.
        z: f64,
    },
    /// Rotation of `angle` radians about `axis`. The axis is normalized before use.
    AxisAngle {
        /// Rotation angle in radians.
        angle: f64,
        /// Rotation axis.
        axis: [f64; 3],
    },
    /// Orthonormal 3x3 rotation matrix with positive determinant.
    Matrix([[f64; 3]; 3]),
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Orientation {
    /// The identity rotation.
    pub fn identity() -> Self {
        Self::Quaternion {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Returns the rotation as a row-major matrix after validating it.
    ///
    /// # Errors
    ///
    /// [`CameraError::InvalidOrientation`] if the quaternion is not unit length, the matrix is
    /// not orthonormal with positive determinant, or the axis is zero or non-finite.
    pub fn rotation_matrix(&self) -> Result<[[f64; 3]; 3], CameraError> {
        Ok(mat3_to_rows(&self.to_mat3()?))
    }

    pub(crate) fn to_mat3(&self) -> Result<DMat3, CameraError> {
        match *self {
            Orientation::Quaternion { w, x, y, z } => {
                let q = DQuat::from_xyzw(x, y, z, w);
                if !q.is_finite() {
                    return Err(CameraError::InvalidOrientation(format!(
                        "quaternion has non-finite components: {:?}",
                        [w, x, y, z]
                    )));
                }
                let norm = q.length();
                if (norm - 1.0).abs() > ORIENTATION_TOLERANCE {
                    return Err(CameraError::InvalidOrientation(format!(
                        "quaternion norm is {norm}, expected 1"
                    )));
                }
                Ok(DMat3::from_quat(q.normalize()))
            }
            Orientation::AxisAngle { angle, axis } => {
                let axis = DVec3::from_array(axis);
                if !axis.is_finite() || !angle.is_finite() {
                    return Err(CameraError::InvalidOrientation(format!(
                        "axis-angle has non-finite components: {angle} {axis}"
                    )));
                }
                let length = axis.length();
                if length < ORIENTATION_TOLERANCE {
                    return Err(CameraError::InvalidOrientation(
                        "cannot build a rotation from a zero axis".to_string(),
                    ));
                }
                Ok(DMat3::from_axis_angle(axis / length, angle))
            }
            Orientation::Matrix(rows) => {
                let m = mat3_from_rows(&rows);
                check_rotation(&m, "orientation matrix")?;
                Ok(m)
            }
        }
    }
}

/// World-space transform of a camera node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenePose {
    /// Camera location in world coordinates.
    pub location: [f64; 3],
    /// Camera object-to-world rotation.
    pub orientation: Orientation,
}

impl ScenePose {
    /// Create a new pose from a location and an orientation.
    pub fn new(location: [f64; 3], orientation: Orientation) -> Self {
        Self {
            location,
            orientation,
        }
    }

    pub(crate) fn location_vec(&self) -> Result<DVec3, CameraError> {
        let location = DVec3::from_array(self.location);
        if !location.is_finite() {
            return Err(CameraError::NonFiniteLocation(self.location));
        }
        Ok(location)
    }
}

/// Checks that `m` is orthonormal with positive determinant.
pub(crate) fn check_rotation(m: &DMat3, what: &str) -> Result<(), CameraError> {
    if !m.is_finite() {
        return Err(CameraError::InvalidOrientation(format!(
            "{what} has non-finite entries"
        )));
    }

    let deviation = (m.transpose() * *m - DMat3::IDENTITY)
        .to_cols_array()
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if deviation > ORIENTATION_TOLERANCE {
        return Err(CameraError::InvalidOrientation(format!(
            "{what} is not orthonormal (max deviation {deviation:e})"
        )));
    }

    let det = m.determinant();
    if det <= 0.0 {
        return Err(CameraError::InvalidOrientation(format!(
            "{what} has determinant {det}, expected +1"
        )));
    }

    Ok(())
}

// glam matrices are column-major, the public API is row-major.
pub(crate) fn mat3_from_rows(rows: &[[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(rows).transpose()
}

pub(crate) fn mat3_to_rows(m: &DMat3) -> [[f64; 3]; 3] {
    m.transpose().to_cols_array_2d()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_orientation() -> Result<(), CameraError> {
        let m = Orientation::identity().rotation_matrix()?;
        assert_eq!(m, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        Ok(())
    }

    #[test]
    fn test_axis_angle_is_normalized() -> Result<(), CameraError> {
        let orientation = Orientation::AxisAngle {
            angle: std::f64::consts::FRAC_PI_2,
            axis: [0.0, 0.0, 4.0],
        };
        let m = orientation.rotation_matrix()?;
        let expected = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(m[i][j], expected[i][j], epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_quaternion_and_matrix_agree() -> Result<(), CameraError> {
        let half = std::f64::consts::FRAC_PI_4;
        let quat = Orientation::Quaternion {
            w: half.cos(),
            x: half.sin(),
            y: 0.0,
            z: 0.0,
        };
        let matrix = Orientation::Matrix([[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]]);
        let a = quat.rotation_matrix()?;
        let b = matrix.rotation_matrix()?;
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a[i][j], b[i][j], epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_non_unit_quaternion_rejected() {
        let orientation = Orientation::Quaternion {
            w: 2.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };
        assert!(matches!(
            orientation.rotation_matrix(),
            Err(CameraError::InvalidOrientation(_))
        ));
    }

    #[test]
    fn test_scaled_matrix_rejected() {
        let orientation = Orientation::Matrix([[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(
            orientation.rotation_matrix(),
            Err(CameraError::InvalidOrientation(_))
        ));
    }

    #[test]
    fn test_reflection_rejected() {
        let orientation =
            Orientation::Matrix([[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(
            orientation.rotation_matrix(),
            Err(CameraError::InvalidOrientation(_))
        ));
    }

    #[test]
    fn test_zero_axis_rejected() {
        let orientation = Orientation::AxisAngle {
            angle: 1.0,
            axis: [0.0, 0.0, 0.0],
        };
        assert!(orientation.rotation_matrix().is_err());
    }

    #[test]
    fn test_non_finite_location() {
        let pose = ScenePose::new([f64::NAN, 0.0, 0.0], Orientation::identity());
        assert!(matches!(
            pose.location_vec(),
            Err(CameraError::NonFiniteLocation(_))
        ));
    }

    #[test]
    fn test_row_major_conversion() {
        let rows = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let m = mat3_from_rows(&rows);
        assert_eq!(m.row(0).to_array(), [1.0, 2.0, 3.0]);
        assert_eq!(m.col(0).to_array(), [1.0, 4.0, 7.0]);
        assert_eq!(mat3_to_rows(&m), rows);
    }
}
