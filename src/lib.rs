// SPDX-License-Identifier: GPL-3.0-only

//! Depth camera sensor
//!
//! Turns a simulated depth camera's raw per-pixel range data into two
//! publishable artifacts, a depth image and a dense organized point
//! cloud, while keeping the camera's projection model consistent with
//! user-supplied lens intrinsics.
//!
//! # Architecture
//!
//! - [`projection`]: projection matrix math (intrinsics to OpenGL
//!   projection and back)
//! - [`buffers`]: mutex-shared frame buffer store between the renderer
//!   callbacks and the publish path
//! - [`depth_image`]: depth to grayscale conversion
//! - [`point_cloud`]: packed point cloud layout and assembly
//! - [`sensor`]: the [`DepthCameraSensor`] orchestrator
//! - [`render`] / [`bus`]: the rendering engine and transport
//!   boundaries
//! - [`config`] / [`noise`] / [`saver`] / [`msgs`] / [`errors`]:
//!   configuration, noise registry, frame saving, wire messages, error
//!   taxonomy

pub mod buffers;
pub mod bus;
pub mod config;
pub mod depth_image;
pub mod errors;
pub mod msgs;
pub mod noise;
pub mod point_cloud;
pub mod projection;
pub mod render;
pub mod saver;
pub mod sensor;

// Re-export commonly used types
pub use config::{CameraSettings, ClipRange, DepthCameraConfig, LensIntrinsics, SensorKind};
pub use errors::{ConfigError, SaveError, SensorError, SensorResult};
pub use msgs::{DepthImage, Header, PixelFormat, PointCloudPacked};
pub use sensor::DepthCameraSensor;
