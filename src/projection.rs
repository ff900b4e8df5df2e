// SPDX-License-Identifier: GPL-3.0-only

//! Projection matrix math
//!
//! Builds the OpenGL-style projection a rendering camera needs from
//! explicit pinhole intrinsics, and recovers intrinsics from a default
//! symmetric projection. All matrices use `glam::DMat4` in the standard
//! OpenGL clip-space convention (right-handed, looking down -Z).

use glam::DMat4;

use crate::config::LensIntrinsics;

/// OpenGL NDC (Normalized Device Coordinates) matrix
///
/// Maps the axis-aligned box spanned by the clip planes onto the
/// canonical `[-1, 1]^3` cube. The caller must guarantee distinct clip
/// planes; coincident planes make the result non-finite.
pub fn build_ndc_matrix(
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
    near: f64,
    far: f64,
) -> DMat4 {
    let inverse_width = 1.0 / (right - left);
    let inverse_height = 1.0 / (top - bottom);
    let inverse_distance = 1.0 / (far - near);

    // Rows listed top to bottom, transposed into glam's column-major form.
    DMat4::from_cols_array_2d(&[
        [
            2.0 * inverse_width,
            0.0,
            0.0,
            -(right + left) * inverse_width,
        ],
        [
            0.0,
            2.0 * inverse_height,
            0.0,
            -(top + bottom) * inverse_height,
        ],
        [
            0.0,
            0.0,
            -2.0 * inverse_distance,
            -(far + near) * inverse_distance,
        ],
        [0.0, 0.0, 0.0, 1.0],
    ])
    .transpose()
}

/// OpenGL perspective matrix from pinhole intrinsics
///
/// The third row encodes `near + far` and `near * far`, the fourth row
/// is `[0, 0, -1, 0]`.
pub fn build_perspective_matrix(
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    skew: f64,
    near: f64,
    far: f64,
) -> DMat4 {
    DMat4::from_cols_array_2d(&[
        [fx, skew, -cx, 0.0],
        [0.0, fy, -cy, 0.0],
        [0.0, 0.0, near + far, near * far],
        [0.0, 0.0, -1.0, 0.0],
    ])
    .transpose()
}

/// OpenGL projection matrix: `ndc * perspective`
///
/// The principal point is flipped to `height - cy` so the image-row-down
/// pixel convention lands in the renderer's Y-up convention.
#[allow(clippy::too_many_arguments)]
pub fn build_projection_matrix(
    image_width: f64,
    image_height: f64,
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    skew: f64,
    near: f64,
    far: f64,
) -> DMat4 {
    build_ndc_matrix(0.0, image_width, 0.0, image_height, near, far)
        * build_perspective_matrix(fx, fy, cx, image_height - cy, skew, near, far)
}

/// Recover pinhole intrinsics from a projection matrix
///
/// Inverse of [`build_projection_matrix`] for the focal lengths and
/// principal point; round trips are exact up to floating point error.
pub fn projection_to_intrinsics(matrix: &DMat4, image_width: u32, image_height: u32) -> LensIntrinsics {
    let width = f64::from(image_width);
    let height = f64::from(image_height);
    let row0 = matrix.row(0);
    let row1 = matrix.row(1);

    LensIntrinsics {
        fx: row0.x * width / 2.0,
        fy: row1.y * height / 2.0,
        cx: (1.0 - row0.z) * width / 2.0,
        cy: (1.0 + row1.z) * height / 2.0,
        skew: row0.y * width / 2.0,
    }
}
