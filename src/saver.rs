// SPDX-License-Identifier: GPL-3.0-only

//! Saving captured depth frames to disk
//!
//! Each saved frame is the grayscale conversion of the raw depth data,
//! written as `<prefix><counter>.png` with the counter starting at 0.

use std::path::PathBuf;
use tracing::debug;

use crate::depth_image;
use crate::errors::SaveError;

/// Writes one PNG per captured depth frame into a fixed directory
#[derive(Debug)]
pub struct FrameSaver {
    path: PathBuf,
    prefix: String,
    counter: u64,
}

impl FrameSaver {
    /// Create a saver writing `<prefix><counter>.png` files under `path`
    pub fn new(path: PathBuf, prefix: String) -> Self {
        Self {
            path,
            prefix,
            counter: 0,
        }
    }

    /// Convert a depth frame to grayscale and save it as a PNG
    ///
    /// Creates the output directory on first use. A directory or encode
    /// failure fails this save only; the counter advances once a
    /// filename has been assigned, so retried ticks never reuse a name.
    pub fn save_depth(&mut self, depth: &[f32], width: u32, height: u32) -> Result<PathBuf, SaveError> {
        if !self.path.is_dir() {
            std::fs::create_dir_all(&self.path).map_err(|e| SaveError::DirectoryCreation {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        }

        let samples = width as usize * height as usize;
        if width == 0 || height == 0 || depth.len() < samples {
            return Err(SaveError::InvalidDimensions { width, height });
        }

        let rgb = depth_image::depth_to_image_vec(depth, width, height);

        let filename = format!("{}{}.png", self.prefix, self.counter);
        self.counter += 1;
        let target = self.path.join(filename);

        let image = image::RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| SaveError::Encoding("image buffer mismatch".to_string()))?;
        image
            .save(&target)
            .map_err(|e| SaveError::Encoding(e.to_string()))?;

        debug!(path = ?target, "Saved depth frame");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "depth-camera-saver-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_filenames_count_up_from_zero() {
        let dir = temp_dir("count");
        let mut saver = FrameSaver::new(dir.clone(), "cam_".to_string());
        let depth = vec![1.0f32, 2.0, 3.0, 4.0];

        let first = saver.save_depth(&depth, 2, 2).unwrap();
        let second = saver.save_depth(&depth, 2, 2).unwrap();
        assert_eq!(first.file_name().unwrap(), "cam_0.png");
        assert_eq!(second.file_name().unwrap(), "cam_1.png");
        assert!(first.is_file());
        assert!(second.is_file());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        let dir = temp_dir("zero");
        let mut saver = FrameSaver::new(dir.clone(), "cam_".to_string());
        assert!(matches!(
            saver.save_depth(&[], 0, 0),
            Err(SaveError::InvalidDimensions { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
