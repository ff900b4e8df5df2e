// SPDX-License-Identifier: GPL-3.0-only

//! Sensor configuration types
//!
//! These structs are the boundary to whatever parses sensor descriptions
//! (SDF, launch files, JSON). The sensor itself only ever sees the
//! deserialized form.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Topic used when the configuration leaves the topic empty
pub const DEFAULT_TOPIC: &str = "/camera/depth";

/// Kind of sensor a configuration describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SensorKind {
    /// Depth camera producing per-pixel range data
    #[default]
    DepthCamera,
    /// Regular RGB camera
    RgbCamera,
    /// Thermal camera
    ThermalCamera,
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorKind::DepthCamera => write!(f, "depth camera"),
            SensorKind::RgbCamera => write!(f, "rgb camera"),
            SensorKind::ThermalCamera => write!(f, "thermal camera"),
        }
    }
}

/// Near and far clip distances in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRange {
    /// Near clip plane distance
    pub near: f64,
    /// Far clip plane distance
    pub far: f64,
}

impl Default for ClipRange {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Pinhole lens intrinsics in pixel units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensIntrinsics {
    /// Horizontal focal length
    pub fx: f64,
    /// Vertical focal length
    pub fy: f64,
    /// Principal point X
    pub cx: f64,
    /// Principal point Y
    pub cy: f64,
    /// Skew coefficient between the x and y pixel axes
    pub skew: f64,
}

/// Declared noise kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoiseKind {
    /// No noise
    #[default]
    None,
    /// Gaussian noise drawn per pixel
    Gaussian,
    /// Gaussian noise quantized to the sensor's output resolution
    GaussianQuantized,
}

/// Noise descriptor for the camera image
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Declared noise kind
    pub kind: NoiseKind,
    /// Mean of the distribution
    pub mean: f64,
    /// Standard deviation of the distribution
    pub stddev: f64,
}

/// Frame saving options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFramesConfig {
    /// Directory the PNG frames are written to
    pub path: PathBuf,
}

/// Camera block of a depth camera sensor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Image width in pixels
    pub image_width: u32,
    /// Image height in pixels
    pub image_height: u32,
    /// Near/far clip distances
    pub clip: ClipRange,
    /// Horizontal field of view in radians
    pub horizontal_fov: f64,
    /// Anti-aliasing sample count
    pub anti_aliasing: u32,
    /// Visibility mask applied to the rendering camera
    pub visibility_mask: u32,
    /// Explicit lens intrinsics; when absent they are recovered from the
    /// renderer's default projection after camera creation
    pub intrinsics: Option<LensIntrinsics>,
    /// Camera image noise descriptor
    pub noise: NoiseConfig,
    /// When set, every captured depth frame is also saved as a PNG
    pub save_frames: Option<SaveFramesConfig>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            clip: ClipRange::default(),
            horizontal_fov: 1.047,
            anti_aliasing: 4,
            visibility_mask: u32::MAX,
            intrinsics: None,
            noise: NoiseConfig::default(),
            save_frames: None,
        }
    }
}

/// Full depth camera sensor configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DepthCameraConfig {
    /// Sensor name, also used as the saved-frame filename prefix
    pub name: String,
    /// Depth image topic; empty selects [`DEFAULT_TOPIC`]. The point
    /// cloud is published on `<topic>/points`.
    pub topic: String,
    /// Declared sensor kind; anything but [`SensorKind::DepthCamera`]
    /// fails creation
    pub kind: SensorKind,
    /// Camera block; `None` fails creation
    pub camera: Option<CameraSettings>,
}
