use std::{fs::File, io::BufReader, path::Path};

use scanview_camera::{AuthoringToolToCv, CameraError, ScenePose};
use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// A multi-camera capture rig as stored in the calibration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    /// One record per camera, in capture order.
    pub setup: Vec<RigCamera>,
}

/// Pose of one rig camera.
///
/// `r` is the row-major camera-to-world rotation of the calibration frame and `t` is the
/// camera centre in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigCamera {
    /// Nine row-major rotation entries.
    #[serde(rename = "R")]
    pub r: Vec<f64>,
    /// Camera centre.
    #[serde(rename = "t")]
    pub t: Vec<f64>,
}

impl RigCamera {
    /// The rotation as a 3x3 row-major matrix.
    pub fn rotation(&self) -> Result<[[f64; 3]; 3], CameraError> {
        if self.r.len() != 9 {
            return Err(CameraError::DimensionMismatch {
                expected: 9,
                actual: self.r.len(),
            });
        }
        let mut m = [[0.0; 3]; 3];
        for (row, chunk) in m.iter_mut().zip(self.r.chunks_exact(3)) {
            row.copy_from_slice(chunk);
        }
        Ok(m)
    }

    /// The camera centre.
    pub fn translation(&self) -> Result<[f64; 3], CameraError> {
        match self.t.as_slice() {
            &[x, y, z] => Ok([x, y, z]),
            other => Err(CameraError::DimensionMismatch {
                expected: 3,
                actual: other.len(),
            }),
        }
    }

    /// The scene camera pose for this rig camera.
    pub fn pose(&self, convention: &AuthoringToolToCv) -> Result<ScenePose, CameraError> {
        convention.calibration_pose(&self.rotation()?, self.translation()?)
    }
}

/// Read a calibration rig file.
///
/// # Arguments
///
/// * `path` - The path to the JSON file with a `setup` array of `{"R": [..9], "t": [..3]}`.
///
/// # Returns
///
/// The rig with at least one camera. Fields other than `R` and `t` are ignored.
pub fn read_camera_rig(path: impl AsRef<Path>) -> Result<CameraRig, RigError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let rig: CameraRig = serde_json::from_reader(reader)?;

    if rig.setup.is_empty() {
        return Err(RigError::EmptyRig);
    }
    log::debug!("read {} rig cameras from {}", rig.setup.len(), path.display());

    Ok(rig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(contents: &str) -> Result<NamedTempFile, std::io::Error> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_read_camera_rig() -> Result<(), RigError> {
        let file = write_json(
            r#"{
                "setup": [
                    {"R": [1, 0, 0, 0, 1, 0, 0, 0, 1], "t": [0.0, 0.0, -2.5], "serial": "A1"},
                    {"R": [0, 0, 1, 0, 1, 0, -1, 0, 0], "t": [2.5, 0.0, 0.0]}
                ],
                "date": "2019-03-02"
            }"#,
        )?;

        let rig = read_camera_rig(file.path())?;
        assert_eq!(rig.setup.len(), 2);
        assert_eq!(rig.setup[1].translation()?, [2.5, 0.0, 0.0]);
        assert_eq!(rig.setup[1].rotation()?[2], [-1.0, 0.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_rig_camera_pose() -> Result<(), RigError> {
        let camera = RigCamera {
            r: vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            t: vec![0.0, 0.0, -2.5],
        };
        let pose = camera.pose(&AuthoringToolToCv::BLENDER)?;
        assert_eq!(pose.location, [0.0, 0.0, -2.5]);

        // half a turn about x
        let m = pose.orientation.rotation_matrix()?;
        assert_relative_eq!(m[0][0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(m[1][1], -1.0, epsilon = 1e-9);
        assert_relative_eq!(m[2][2], -1.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn test_rig_camera_wrong_lengths() {
        let camera = RigCamera {
            r: vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            t: vec![0.0, 0.0],
        };
        assert_eq!(
            camera.rotation(),
            Err(CameraError::DimensionMismatch {
                expected: 9,
                actual: 6
            })
        );
        assert_eq!(
            camera.translation(),
            Err(CameraError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_read_empty_rig() -> Result<(), std::io::Error> {
        let file = write_json(r#"{"setup": []}"#)?;
        assert!(matches!(
            read_camera_rig(file.path()),
            Err(RigError::EmptyRig)
        ));
        Ok(())
    }

    #[test]
    fn test_read_malformed_rig() -> Result<(), std::io::Error> {
        let file = write_json(r#"{"setup": [{"R": [1, 0]}]}"#)?;
        assert!(matches!(read_camera_rig(file.path()), Err(RigError::Json(_))));

        assert!(matches!(
            read_camera_rig("/nonexistent/rig.json"),
            Err(RigError::Io(_))
        ));
        Ok(())
    }
}
