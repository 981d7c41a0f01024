use glam::{DMat3, DQuat};

use crate::convention::AuthoringToolToCv;
use crate::error::CameraError;
use crate::extrinsics::Extrinsics;
use crate::intrinsics::Intrinsics;
use crate::rotation::{check_rotation, mat3_from_rows, mat3_to_rows, Orientation, ScenePose};
use crate::scene::{ImageSize, LensShift, PixelAspect, SceneCamera, SensorFit};

/// Build a camera node pose from a location and an object-to-world rotation matrix.
///
/// The rotation is converted to a quaternion and from there to axis-angle, the
/// representation the tool is switched to when a pose is installed.
///
/// # Errors
///
/// [`CameraError::InvalidOrientation`] if `rotation` is not a proper rotation and
/// [`CameraError::NonFiniteLocation`] if the location is not finite.
pub fn install_pose(
    location: [f64; 3],
    rotation: &[[f64; 3]; 3],
) -> Result<ScenePose, CameraError> {
    let m = mat3_from_rows(rotation);
    check_rotation(&m, "installed rotation")?;

    let (axis, angle) = DQuat::from_mat3(&m).normalize().to_axis_angle();
    let pose = ScenePose::new(
        location,
        Orientation::AxisAngle {
            angle,
            axis: axis.to_array(),
        },
    );
    // reject a non-finite location here rather than at the next derivation
    pose.location_vec()?;

    log::debug!("installed pose: {:?}", pose);
    Ok(pose)
}

/// Build the camera node pose whose extrinsics are `rt`.
///
/// This is the inverse of [`crate::extrinsics()`]: the node orientation is `R^T * B` and the
/// location is the camera centre `-R^T * T`.
pub fn pose_from_extrinsics(
    rt: &Extrinsics,
    convention: &AuthoringToolToCv,
) -> Result<ScenePose, CameraError> {
    let (r, t) = rt.to_glam();
    check_rotation(&r, "extrinsic rotation")?;
    let basis: DMat3 = convention.basis()?;

    let orientation = r.transpose() * basis.transpose();
    let location = -(r.transpose() * t);

    install_pose(location.to_array(), &mat3_to_rows(&orientation))
}

impl SceneCamera {
    /// Build a scene camera whose lens-shift intrinsics reproduce `k` at `size`.
    ///
    /// The sensor is one unit wide with the image aspect, the fit is horizontal and the
    /// resolution is taken at 100 %. The pose is the identity.
    ///
    /// # Errors
    ///
    /// [`CameraError::InvalidIntrinsics`] if a focal length is not positive or the skew is
    /// not zero, [`CameraError::InvalidSensorConfiguration`] if `size` is empty.
    pub fn from_intrinsics(
        k: &Intrinsics,
        size: ImageSize,
        convention: &AuthoringToolToCv,
    ) -> Result<Self, CameraError> {
        let positive = |f: f64| f.is_finite() && f > 0.0;
        if !(positive(k.alpha_u) && positive(k.alpha_v)) {
            return Err(CameraError::InvalidIntrinsics(format!(
                "focal lengths must be positive, got ({}, {})",
                k.alpha_u, k.alpha_v
            )));
        }
        if k.skew != 0.0 {
            return Err(CameraError::InvalidIntrinsics(format!(
                "skewed pixels cannot be installed, got skew {}",
                k.skew
            )));
        }
        if size.width == 0 || size.height == 0 {
            return Err(CameraError::InvalidSensorConfiguration(format!(
                "image size must be positive, got {}x{}",
                size.width, size.height
            )));
        }
        convention.check_shift_signs()?;

        let width = size.width as f64;
        let height = size.height as f64;

        let camera = Self {
            lens_mm: k.alpha_u / width,
            sensor_width_mm: 1.0,
            sensor_height_mm: height / width,
            sensor_fit: SensorFit::Horizontal,
            resolution: size,
            resolution_percentage: 100.0,
            pixel_aspect: PixelAspect {
                x: 1.0,
                y: k.alpha_u / k.alpha_v,
            },
            shift: LensShift {
                x: (k.u0 / width - 0.5) / convention.shift_sign_x,
                y: (k.v0 - 0.5 * height) / (width * convention.shift_sign_y),
            },
            pose: ScenePose::default(),
        };
        log::debug!("installed intrinsics: {:?}", camera);

        Ok(camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extrinsics::extrinsics;
    use crate::intrinsics::{intrinsics, PrincipalPointMode};
    use approx::assert_relative_eq;

    const BLENDER: AuthoringToolToCv = AuthoringToolToCv::BLENDER;

    fn assert_extrinsics_eq(a: &Extrinsics, b: &Extrinsics) {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a.rotation[i][j], b.rotation[i][j], epsilon = 1e-9);
            }
            assert_relative_eq!(a.translation[i], b.translation[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_install_identity() -> Result<(), CameraError> {
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let pose = install_pose([1.0, 2.0, 3.0], &identity)?;
        match pose.orientation {
            Orientation::AxisAngle { angle, .. } => assert_eq!(angle, 0.0),
            other => panic!("expected axis-angle, got {:?}", other),
        }
        assert_eq!(pose.location, [1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn test_install_quarter_turn() -> Result<(), CameraError> {
        let rotation = [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let pose = install_pose([0.0; 3], &rotation)?;
        let Orientation::AxisAngle { angle, axis } = pose.orientation else {
            panic!("expected axis-angle");
        };
        assert_relative_eq!(angle, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(axis[2], 1.0, epsilon = 1e-12);

        let back = pose.orientation.rotation_matrix()?;
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(back[i][j], rotation[i][j], epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_install_rejects_reflection() {
        let reflection = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]];
        assert!(matches!(
            install_pose([0.0; 3], &reflection),
            Err(CameraError::InvalidOrientation(_))
        ));
    }

    #[test]
    fn test_pose_from_extrinsics_round_trip() -> Result<(), CameraError> {
        let pose = ScenePose::new(
            [0.2, -1.0, 3.5],
            Orientation::AxisAngle {
                angle: 2.1,
                axis: [0.3, -0.5, 0.8],
            },
        );
        let rt = extrinsics(&pose, &BLENDER)?;
        let installed = pose_from_extrinsics(&rt, &BLENDER)?;
        let rt_back = extrinsics(&installed, &BLENDER)?;
        assert_extrinsics_eq(&rt, &rt_back);
        Ok(())
    }

    #[test]
    fn test_identity_extrinsics_pose() -> Result<(), CameraError> {
        // RT = [I | 0] is a camera at the origin flipped half a turn about x
        let rt = Extrinsics::new(
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            [0.0; 3],
        )?;
        let pose = pose_from_extrinsics(&rt, &BLENDER)?;
        let Orientation::AxisAngle { angle, axis } = pose.orientation else {
            panic!("expected axis-angle");
        };
        assert_relative_eq!(angle, std::f64::consts::PI, epsilon = 1e-12);
        assert_relative_eq!(axis[0].abs(), 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_from_intrinsics_reproduces_k() -> Result<(), CameraError> {
        let k = Intrinsics::new(1498.2242623, 1498.22426253, 790.263706, 578.90334);
        let size = ImageSize::new(1600, 1200);
        let camera = SceneCamera::from_intrinsics(&k, size, &BLENDER)?;
        camera.validate()?;

        let k_back = intrinsics(&camera, PrincipalPointMode::LensShift, &BLENDER)?;
        assert_relative_eq!(k_back.alpha_u, k.alpha_u, epsilon = 1e-9);
        assert_relative_eq!(k_back.alpha_v, k.alpha_v, epsilon = 1e-9);
        assert_relative_eq!(k_back.u0, k.u0, epsilon = 1e-9);
        assert_relative_eq!(k_back.v0, k.v0, epsilon = 1e-9);
        assert_eq!(k_back.skew, 0.0);
        Ok(())
    }

    #[test]
    fn test_from_intrinsics_shift_signs() -> Result<(), CameraError> {
        // principal point left of and below the centre
        let k = Intrinsics::new(1000.0, 1000.0, 700.0, 650.0);
        let camera = SceneCamera::from_intrinsics(&k, ImageSize::new(1600, 1200), &BLENDER)?;
        assert_relative_eq!(camera.shift.x, 0.5 - 700.0 / 1600.0, epsilon = 1e-12);
        assert_relative_eq!(camera.shift.y, 50.0 / 1600.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_from_intrinsics_rejects_bad_input() {
        let size = ImageSize::new(640, 480);
        let zero_focal = Intrinsics::new(0.0, 500.0, 320.0, 240.0);
        assert!(matches!(
            SceneCamera::from_intrinsics(&zero_focal, size, &BLENDER),
            Err(CameraError::InvalidIntrinsics(_))
        ));

        let skewed = Intrinsics {
            skew: 1.0,
            ..Intrinsics::new(500.0, 500.0, 320.0, 240.0)
        };
        assert!(SceneCamera::from_intrinsics(&skewed, size, &BLENDER).is_err());

        let k = Intrinsics::new(500.0, 500.0, 320.0, 240.0);
        assert!(matches!(
            SceneCamera::from_intrinsics(&k, ImageSize::new(0, 480), &BLENDER),
            Err(CameraError::InvalidSensorConfiguration(_))
        ));
    }
}
