// SPDX-License-Identifier: GPL-3.0-only

//! Rendering engine boundary
//!
//! The sensor drives a rendering camera it does not own the internals
//! of. These traits cover exactly the calls the sensor makes; the
//! engine's scene graph and GPU depth pipeline stay behind them.

use glam::DMat4;

/// Callback invoked with a freshly rendered frame:
/// `(data, width, height, channels)`
pub type FrameCallback = Box<dyn FnMut(&[f32], u32, u32, u32) + Send>;

/// A depth rendering camera created by a [`Scene`]
///
/// `render` must synchronously deliver new frames to the connected
/// callbacks before returning; the sensor relies on that contract
/// instead of its own wait/notify.
pub trait DepthRenderCamera: Send {
    /// Set the image width in pixels
    fn set_image_width(&mut self, width: u32);
    /// Set the image height in pixels
    fn set_image_height(&mut self, height: u32);
    /// Current image width in pixels
    fn image_width(&self) -> u32;
    /// Current image height in pixels
    fn image_height(&self) -> u32;
    /// Set the near clip plane distance
    fn set_near_clip(&mut self, near: f64);
    /// Set the far clip plane distance
    fn set_far_clip(&mut self, far: f64);
    /// Near clip plane distance
    fn near_clip(&self) -> f64;
    /// Far clip plane distance
    fn far_clip(&self) -> f64;
    /// Set the aspect ratio
    fn set_aspect_ratio(&mut self, ratio: f64);
    /// Set the horizontal field of view in radians
    fn set_horizontal_fov(&mut self, fov: f64);
    /// Set the anti-aliasing sample count
    fn set_anti_aliasing(&mut self, samples: u32);
    /// Set the visibility mask
    fn set_visibility_mask(&mut self, mask: u32);
    /// Attach Gaussian image noise evaluated during rendering
    fn set_image_gaussian_noise(&mut self, mean: f64, stddev: f64);
    /// Current projection matrix
    fn projection_matrix(&self) -> DMat4;
    /// Override the projection matrix
    fn set_projection_matrix(&mut self, matrix: DMat4);
    /// Create the GPU depth texture backing this camera
    fn create_depth_texture(&mut self);
    /// Connect a callback for new depth frames
    fn connect_depth_frame(&mut self, callback: FrameCallback);
    /// Connect a callback for new interleaved point cloud frames
    fn connect_point_cloud(&mut self, callback: FrameCallback);
    /// Run one render pass, driving the connected callbacks
    fn render(&mut self);
}

/// Scene a depth camera can be created in
pub trait Scene {
    /// Create a depth camera attached to this scene's root
    fn create_depth_camera(&mut self, name: &str) -> Box<dyn DepthRenderCamera>;
}
