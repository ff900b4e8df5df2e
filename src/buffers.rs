// SPDX-License-Identifier: GPL-3.0-only

//! Shared frame buffer store
//!
//! Owns the raw buffers the renderer's capture callbacks write into and
//! the derived buffers the publish path reads from. Buffers are
//! allocated on the first capture and reused afterwards; sensor
//! resolution is fixed for the sensor's lifetime, so a capture with
//! different dimensions is rejected rather than reallocated. All access
//! happens under the sensor's shared mutex.

use tracing::warn;

use crate::msgs::PointCloudPacked;

/// Raw and derived frame buffers shared between the capture callbacks
/// and the publish path
#[derive(Debug, Default)]
pub struct FrameBufferStore {
    /// Latest raw depth frame, empty until the first capture
    pub(crate) depth: Vec<f32>,
    depth_dims: Option<(u32, u32)>,
    /// Latest raw interleaved cloud frame, empty until the first capture
    pub(crate) cloud: Vec<f32>,
    cloud_dims: Option<(u32, u32, u32)>,
    /// Derived xyz triples, recomputed every publish cycle
    pub(crate) xyz: Vec<f32>,
    /// Derived grayscale RGB image, recomputed every publish cycle
    pub(crate) image: Vec<u8>,
    /// The packed cloud message; layout set once at configuration,
    /// payload rewritten every publish cycle
    pub(crate) point_msg: PointCloudPacked,
}

impl FrameBufferStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a raw depth frame into the store
    ///
    /// Allocates on the first call; later calls reuse the buffer. A
    /// frame whose dimensions differ from the first capture is dropped
    /// with a warning.
    pub fn capture_depth(&mut self, data: &[f32], width: u32, height: u32) {
        let samples = (width * height) as usize;
        if data.len() < samples {
            warn!(len = data.len(), samples, "Dropping short depth frame");
            return;
        }
        match self.depth_dims {
            None => {
                self.depth = data[..samples].to_vec();
                self.depth_dims = Some((width, height));
            }
            Some(dims) if dims == (width, height) => {
                self.depth.copy_from_slice(&data[..samples]);
            }
            Some((w, h)) => {
                warn!(
                    expected_width = w,
                    expected_height = h,
                    width,
                    height,
                    "Dropping depth frame with unexpected dimensions"
                );
            }
        }
    }

    /// Copy a raw interleaved point cloud frame into the store
    ///
    /// Same allocation and dimension rules as [`Self::capture_depth`].
    pub fn capture_cloud(&mut self, data: &[f32], width: u32, height: u32, channels: u32) {
        let samples = (width * height * channels) as usize;
        if data.len() < samples {
            warn!(len = data.len(), samples, "Dropping short point cloud frame");
            return;
        }
        match self.cloud_dims {
            None => {
                self.cloud = data[..samples].to_vec();
                self.cloud_dims = Some((width, height, channels));
            }
            Some(dims) if dims == (width, height, channels) => {
                self.cloud.copy_from_slice(&data[..samples]);
            }
            Some((w, h, c)) => {
                warn!(
                    expected_width = w,
                    expected_height = h,
                    expected_channels = c,
                    width,
                    height,
                    channels,
                    "Dropping point cloud frame with unexpected dimensions"
                );
            }
        }
    }

    /// Latest depth frame, if one was captured
    pub fn depth(&self) -> Option<&[f32]> {
        self.depth_dims.map(|_| self.depth.as_slice())
    }

    /// True once a cloud frame has been captured
    pub fn has_cloud(&self) -> bool {
        self.cloud_dims.is_some()
    }

    /// Channels per pixel of the captured cloud frame
    pub fn cloud_channels(&self) -> Option<u32> {
        self.cloud_dims.map(|(_, _, c)| c)
    }

    /// Size the derived xyz and grayscale buffers for the given
    /// resolution, reallocating only when the dimensions changed
    pub fn ensure_derived(&mut self, width: u32, height: u32) {
        let samples = (width * height) as usize;
        if self.xyz.len() != samples * 3 {
            self.xyz = vec![0.0; samples * 3];
        }
        if self.image.len() != samples * 3 {
            self.image = vec![0; samples * 3];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_lazy_allocation_and_reuse() {
        let mut store = FrameBufferStore::new();
        assert!(store.depth().is_none());

        store.capture_depth(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(store.depth().unwrap(), &[1.0, 2.0, 3.0, 4.0]);
        let ptr = store.depth().unwrap().as_ptr();

        store.capture_depth(&[5.0, 6.0, 7.0, 8.0], 2, 2);
        assert_eq!(store.depth().unwrap(), &[5.0, 6.0, 7.0, 8.0]);
        // Same allocation, no per-frame churn.
        assert_eq!(store.depth().unwrap().as_ptr(), ptr);
    }

    #[test]
    fn test_mismatched_dimensions_are_dropped() {
        let mut store = FrameBufferStore::new();
        store.capture_depth(&[1.0, 2.0], 2, 1);
        store.capture_depth(&[9.0; 6], 3, 2);
        // The stored frame is untouched.
        assert_eq!(store.depth().unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_cloud_capture_tracks_channels() {
        let mut store = FrameBufferStore::new();
        assert!(!store.has_cloud());
        store.capture_cloud(&[0.0; 8], 2, 1, 4);
        assert!(store.has_cloud());
        assert_eq!(store.cloud_channels(), Some(4));
    }

    #[test]
    fn test_ensure_derived_reuses_allocations() {
        let mut store = FrameBufferStore::new();
        store.ensure_derived(2, 2);
        assert_eq!(store.xyz.len(), 12);
        assert_eq!(store.image.len(), 12);
        let xyz_ptr = store.xyz.as_ptr();
        store.ensure_derived(2, 2);
        assert_eq!(store.xyz.as_ptr(), xyz_ptr);
    }
}
