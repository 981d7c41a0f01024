use serde::{Deserialize, Serialize};

use crate::error::CameraError;
use crate::rotation::ScenePose;

/// Which physical sensor dimension is held fixed when mapping it onto the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SensorFit {
    /// Fit along the larger image dimension. Handled like [`SensorFit::Horizontal`].
    #[default]
    Auto,
    /// The sensor width is fixed.
    Horizontal,
    /// The sensor height is fixed.
    Vertical,
}

/// Image resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Create a new image size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Pixel aspect as the tool stores it, as two relative extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelAspect {
    /// Relative horizontal extent of a pixel.
    pub x: f64,
    /// Relative vertical extent of a pixel.
    pub y: f64,
}

impl PixelAspect {
    /// The pixel aspect ratio `x / y`.
    pub fn ratio(&self) -> f64 {
        self.x / self.y
    }
}

impl Default for PixelAspect {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

/// Lens shift, as a fraction of the sensor width.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LensShift {
    /// Horizontal shift.
    pub x: f64,
    /// Vertical shift.
    pub y: f64,
}

/// Every scene and render setting the camera conversions read.
///
/// This replaces the tool's implicit "current scene" state: nothing outside this record is
/// consulted by any conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCamera {
    /// Lens focal length in millimetres.
    pub lens_mm: f64,
    /// Sensor width in millimetres.
    pub sensor_width_mm: f64,
    /// Sensor height in millimetres.
    pub sensor_height_mm: f64,
    /// Sensor fit mode.
    pub sensor_fit: SensorFit,
    /// Render resolution at 100 %.
    pub resolution: ImageSize,
    /// Render resolution scale in percent.
    pub resolution_percentage: f64,
    /// Pixel aspect.
    pub pixel_aspect: PixelAspect,
    /// Lens shift.
    pub shift: LensShift,
    /// World transform of the camera node.
    pub pose: ScenePose,
}

impl Default for SceneCamera {
    fn default() -> Self {
        Self {
            lens_mm: 50.0,
            sensor_width_mm: 36.0,
            sensor_height_mm: 24.0,
            sensor_fit: SensorFit::Auto,
            resolution: ImageSize::new(1920, 1080),
            resolution_percentage: 100.0,
            pixel_aspect: PixelAspect::default(),
            shift: LensShift::default(),
            pose: ScenePose::default(),
        }
    }
}

impl SceneCamera {
    /// Replace the camera pose.
    pub fn with_pose(mut self, pose: ScenePose) -> Self {
        self.pose = pose;
        self
    }

    /// Resolution scale factor, `resolution_percentage / 100`.
    pub fn scale(&self) -> f64 {
        self.resolution_percentage / 100.0
    }

    /// Scaled resolution as floating point `(width, height)`.
    pub fn scaled_size(&self) -> (f64, f64) {
        let scale = self.scale();
        (
            self.resolution.width as f64 * scale,
            self.resolution.height as f64 * scale,
        )
    }

    /// Size of the rendered image in whole pixels.
    pub fn render_size(&self) -> ImageSize {
        let (width, height) = self.scaled_size();
        ImageSize::new(width as u32, height as u32)
    }

    /// Horizontal field of view in radians derived from the lens and the sensor width.
    pub fn horizontal_fov(&self) -> Result<f64, CameraError> {
        positive("lens", self.lens_mm)?;
        positive("sensor width", self.sensor_width_mm)?;
        Ok(2.0 * (self.sensor_width_mm / (2.0 * self.lens_mm)).atan())
    }

    /// Set the lens focal length so the camera covers `fov` radians horizontally.
    ///
    /// # Errors
    ///
    /// [`CameraError::InvalidSensorConfiguration`] if `fov` is outside `(0, pi)` or the
    /// sensor width is not positive.
    pub fn with_horizontal_fov(mut self, fov: f64) -> Result<Self, CameraError> {
        if !(fov > 0.0 && fov < std::f64::consts::PI) {
            return Err(CameraError::InvalidSensorConfiguration(format!(
                "field of view must be in (0, pi), got {fov}"
            )));
        }
        positive("sensor width", self.sensor_width_mm)?;
        self.lens_mm = self.sensor_width_mm / 2.0 / (fov / 2.0).tan();
        Ok(self)
    }

    /// Check every value the intrinsics divide by or scale with.
    ///
    /// # Errors
    ///
    /// [`CameraError::InvalidSensorConfiguration`] naming the first offending value.
    pub fn validate(&self) -> Result<(), CameraError> {
        positive("lens", self.lens_mm)?;
        positive("sensor width", self.sensor_width_mm)?;
        positive("sensor height", self.sensor_height_mm)?;
        positive("resolution width", self.resolution.width as f64)?;
        positive("resolution height", self.resolution.height as f64)?;
        positive("resolution percentage", self.resolution_percentage)?;
        positive("pixel aspect x", self.pixel_aspect.x)?;
        positive("pixel aspect y", self.pixel_aspect.y)?;
        if !self.shift.x.is_finite() || !self.shift.y.is_finite() {
            return Err(CameraError::InvalidSensorConfiguration(format!(
                "lens shift must be finite, got {:?}",
                self.shift
            )));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), CameraError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidSensorConfiguration(format!(
            "{name} must be positive, got {value}"
        )))
    }
}
