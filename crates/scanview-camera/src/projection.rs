use serde::{Deserialize, Serialize};

use crate::convention::AuthoringToolToCv;
use crate::error::CameraError;
use crate::extrinsics::{extrinsics, Extrinsics};
use crate::intrinsics::{intrinsics, Intrinsics, PrincipalPointMode};
use crate::scene::SceneCamera;

const HOMOGENEOUS_EPSILON: f64 = 1e-12;

/// The 3x4 projection matrix `P = K * [R | T]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionMatrix {
    /// Row-major matrix entries.
    pub matrix: [[f64; 4]; 3],
}

impl ProjectionMatrix {
    /// Create a projection matrix from twelve row-major values.
    pub fn from_row_slice(values: &[f64]) -> Result<Self, CameraError> {
        if values.len() != 12 {
            return Err(CameraError::DimensionMismatch {
                expected: 12,
                actual: values.len(),
            });
        }
        let mut matrix = [[0.0; 4]; 3];
        for (row, chunk) in matrix.iter_mut().zip(values.chunks_exact(4)) {
            row.copy_from_slice(chunk);
        }
        Ok(Self { matrix })
    }

    /// Project a world point to homogeneous image coordinates.
    pub fn project_homogeneous(&self, point: &[f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (o, row) in out.iter_mut().zip(self.matrix.iter()) {
            *o = row[0] * point[0] + row[1] * point[1] + row[2] * point[2] + row[3];
        }
        out
    }

    /// Project a world point to pixel coordinates.
    ///
    /// Returns `None` when the point lies on the principal plane of the camera.
    pub fn project(&self, point: &[f64; 3]) -> Option<[f64; 2]> {
        let [u, v, w] = self.project_homogeneous(point);
        if w.abs() < HOMOGENEOUS_EPSILON {
            return None;
        }
        Some([u / w, v / w])
    }
}

/// Compose the projection matrix `P = K * RT`.
pub fn projection(k: &Intrinsics, rt: &Extrinsics) -> ProjectionMatrix {
    let k = k.matrix();
    let rt = rt.matrix();

    let mut p = [[0.0; 4]; 3];
    for (i, row) in p.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = k[i][0] * rt[0][j] + k[i][1] * rt[1][j] + k[i][2] * rt[2][j];
        }
    }

    ProjectionMatrix { matrix: p }
}

/// The intrinsic, extrinsic and projection matrices of one camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraMatrices {
    /// Projection matrix.
    pub p: ProjectionMatrix,
    /// Intrinsic matrix.
    pub k: Intrinsics,
    /// Extrinsic matrix.
    pub rt: Extrinsics,
}

impl SceneCamera {
    /// Derive K, RT and P for this camera.
    ///
    /// Example:
    ///
    /// ```
    /// use scanview_camera::{AuthoringToolToCv, PrincipalPointMode, SceneCamera};
    ///
    /// let camera = SceneCamera::default();
    /// let m = camera.matrices(PrincipalPointMode::Centered, &AuthoringToolToCv::BLENDER)?;
    /// // the camera looks down -z, a point in front of it lands on the principal point
    /// assert_eq!(m.p.project(&[0.0, 0.0, -2.0]), Some([960.0, 540.0]));
    /// # Ok::<(), scanview_camera::CameraError>(())
    /// ```
    pub fn matrices(
        &self,
        mode: PrincipalPointMode,
        convention: &AuthoringToolToCv,
    ) -> Result<CameraMatrices, CameraError> {
        let k = intrinsics(self, mode, convention)?;
        let rt = extrinsics(&self.pose, convention)?;
        Ok(CameraMatrices {
            p: projection(&k, &rt),
            k,
            rt,
        })
    }

    /// Normalized view coordinates of a world point.
    ///
    /// Returns `[x, y, depth]` where `x` and `y` span `[0, 1]` across the frame with the
    /// origin at the bottom-left corner, and `depth` is the distance along the viewing
    /// direction. A point on the camera plane maps to `[0.5, 0.5, 0.0]`.
    pub fn world_to_camera_view(
        &self,
        point: &[f64; 3],
        mode: PrincipalPointMode,
        convention: &AuthoringToolToCv,
    ) -> Result<[f64; 3], CameraError> {
        let CameraMatrices { k, rt, .. } = self.matrices(mode, convention)?;
        let [x, y, depth] = rt.transform_point(point);
        if depth.abs() < HOMOGENEOUS_EPSILON {
            return Ok([0.5, 0.5, 0.0]);
        }

        let u = k.alpha_u * x / depth + k.skew * y / depth + k.u0;
        let v = k.alpha_v * y / depth + k.v0;
        let (width, height) = self.scaled_size();

        Ok([u / width, 1.0 - v / height, depth])
    }

    /// Pixel coordinates of a world point in the rendered image, origin at the top-left.
    pub fn project_to_pixel(
        &self,
        point: &[f64; 3],
        mode: PrincipalPointMode,
        convention: &AuthoringToolToCv,
    ) -> Result<[f64; 2], CameraError> {
        let [x, y, _] = self.world_to_camera_view(point, mode, convention)?;
        let size = self.render_size();
        let (width, height) = (size.width as f64, size.height as f64);
        Ok([x * width, height - y * height])
    }
}
