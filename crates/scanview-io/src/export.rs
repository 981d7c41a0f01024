use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use scanview_camera::{CameraMatrices, Extrinsics, ImageSize, Intrinsics, ProjectionMatrix};
use serde::{Deserialize, Serialize};

use crate::error::RigError;

/// The matrices of one rendered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraExport {
    /// View name, usually the output image stem.
    pub name: String,
    /// Rendered image size in pixels.
    pub image_size: ImageSize,
    /// Intrinsic matrix.
    pub k: Intrinsics,
    /// Extrinsic matrix.
    pub rt: Extrinsics,
    /// Projection matrix.
    pub p: ProjectionMatrix,
}

impl CameraExport {
    /// Bundle the matrices of a view under `name`.
    pub fn new(name: impl Into<String>, image_size: ImageSize, matrices: &CameraMatrices) -> Self {
        Self {
            name: name.into(),
            image_size,
            k: matrices.k,
            rt: matrices.rt,
            p: matrices.p,
        }
    }
}

/// Write the exported cameras as a JSON array.
pub fn write_camera_exports(
    path: impl AsRef<Path>,
    exports: &[CameraExport],
) -> Result<(), RigError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, exports)?;
    writer.flush()?;

    log::debug!("wrote {} cameras to {}", exports.len(), path.display());
    Ok(())
}

/// Read cameras written by [`write_camera_exports`].
pub fn read_camera_exports(path: impl AsRef<Path>) -> Result<Vec<CameraExport>, RigError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
