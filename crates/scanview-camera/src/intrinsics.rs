use serde::{Deserialize, Serialize};

use crate::convention::AuthoringToolToCv;
use crate::error::CameraError;
use crate::scene::{SceneCamera, SensorFit};

/// How the principal point of the intrinsic matrix is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrincipalPointMode {
    /// Image centre of the scaled resolution, lens shift is ignored.
    #[default]
    Centered,
    /// Image centre offset by the camera lens shift.
    LensShift,
}

/// Intrinsic parameters of a pinhole camera, the matrix K.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    /// Focal length in pixels along the image x axis.
    pub alpha_u: f64,
    /// Focal length in pixels along the image y axis.
    pub alpha_v: f64,
    /// Principal point x coordinate in pixels.
    pub u0: f64,
    /// Principal point y coordinate in pixels.
    pub v0: f64,
    /// Axis skew, zero for rectangular pixels.
    pub skew: f64,
}

impl Intrinsics {
    /// Create intrinsics with rectangular pixels.
    pub fn new(alpha_u: f64, alpha_v: f64, u0: f64, v0: f64) -> Self {
        Self {
            alpha_u,
            alpha_v,
            u0,
            v0,
            skew: 0.0,
        }
    }

    /// The 3x3 intrinsic matrix, row-major.
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.alpha_u, self.skew, self.u0],
            [0.0, self.alpha_v, self.v0],
            [0.0, 0.0, 1.0],
        ]
    }

    /// Create intrinsics from a 3x3 intrinsic matrix.
    ///
    /// # Errors
    ///
    /// [`CameraError::InvalidIntrinsics`] if the matrix is not of the form
    /// `[[fx, s, cx], [0, fy, cy], [0, 0, 1]]`.
    pub fn from_matrix(k: &[[f64; 3]; 3]) -> Result<Self, CameraError> {
        if k[1][0] != 0.0 || k[2][0] != 0.0 || k[2][1] != 0.0 || k[2][2] != 1.0 {
            return Err(CameraError::InvalidIntrinsics(
                "Intrinsics matrix must have form [[fx, s, cx], [0, fy, cy], [0, 0, 1]]"
                    .to_string(),
            ));
        }

        Ok(Self {
            alpha_u: k[0][0],
            alpha_v: k[1][1],
            u0: k[0][2],
            v0: k[1][2],
            skew: k[0][1],
        })
    }

    /// Create intrinsics from nine row-major values.
    pub fn from_row_slice(values: &[f64]) -> Result<Self, CameraError> {
        let rows: [[f64; 3]; 3] = match values {
            [a, b, c, d, e, f, g, h, i] => [[*a, *b, *c], [*d, *e, *f], [*g, *h, *i]],
            _ => {
                return Err(CameraError::DimensionMismatch {
                    expected: 9,
                    actual: values.len(),
                })
            }
        };
        Self::from_matrix(&rows)
    }
}

/// Compute the intrinsic matrix K of a scene camera.
///
/// The focal lengths depend on the sensor fit: with [`SensorFit::Vertical`] the sensor
/// height is fixed and the pixel aspect stretches the width, otherwise the sensor width is
/// fixed and the pixel aspect stretches the height.
///
/// # Arguments
///
/// * `camera` - The scene camera.
/// * `mode` - Whether the principal point honours the lens shift.
/// * `convention` - The lens shift signs of the authoring tool.
///
/// # Errors
///
/// [`CameraError::InvalidSensorConfiguration`] if any length, resolution, scale or pixel
/// aspect is not strictly positive.
///
/// Example:
///
/// ```
/// use scanview_camera::{intrinsics, AuthoringToolToCv, PrincipalPointMode, SceneCamera};
///
/// let camera = SceneCamera::default();
/// let k = intrinsics(&camera, PrincipalPointMode::Centered, &AuthoringToolToCv::BLENDER)?;
/// assert_eq!(k.u0, 960.0);
/// assert_eq!(k.v0, 540.0);
/// # Ok::<(), scanview_camera::CameraError>(())
/// ```
pub fn intrinsics(
    camera: &SceneCamera,
    mode: PrincipalPointMode,
    convention: &AuthoringToolToCv,
) -> Result<Intrinsics, CameraError> {
    camera.validate()?;

    let (width, height) = camera.scaled_size();
    let pixel_aspect_ratio = camera.pixel_aspect.ratio();

    let (s_u, s_v) = match camera.sensor_fit {
        SensorFit::Vertical => (
            width / camera.sensor_width_mm / pixel_aspect_ratio,
            height / camera.sensor_height_mm,
        ),
        SensorFit::Horizontal | SensorFit::Auto => (
            width / camera.sensor_width_mm,
            height * pixel_aspect_ratio / camera.sensor_height_mm,
        ),
    };

    let (u0, v0) = match mode {
        PrincipalPointMode::Centered => (width / 2.0, height / 2.0),
        PrincipalPointMode::LensShift => {
            convention.check_shift_signs()?;
            (
                width * (0.5 + convention.shift_sign_x * camera.shift.x),
                height * 0.5 + width * convention.shift_sign_y * camera.shift.y,
            )
        }
    };

    let k = Intrinsics::new(camera.lens_mm * s_u, camera.lens_mm * s_v, u0, v0);
    log::debug!("intrinsics ({:?}, {:?}): {:?}", camera.sensor_fit, mode, k);

    Ok(k)
}
