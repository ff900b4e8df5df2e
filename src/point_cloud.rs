// SPDX-License-Identifier: GPL-3.0-only

//! Packed point cloud assembly
//!
//! Defines the wire layout of one packed point and fills the point
//! cloud message from an xyz buffer plus a grayscale colour image. The
//! layout keeps the xyz and rgb fields memory-aligned: x/y/z at offsets
//! 0/4/8, rgb at 16, 32 bytes per point.

use bytemuck::{Pod, Zeroable};

use crate::msgs::{FieldType, Header, PointCloudPacked, PointField};

/// Bytes one packed point occupies
pub const POINT_STEP: u32 = std::mem::size_of::<PackedPoint>() as u32;

/// One point of the packed cloud payload
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PackedPoint {
    /// X coordinate in the optical frame
    pub x: f32,
    /// Y coordinate in the optical frame
    pub y: f32,
    /// Z coordinate in the optical frame
    pub z: f32,
    _pad0: u32,
    /// Colour packed as `0x00RRGGBB` reinterpreted as float bits
    pub rgb: f32,
    _pad1: [u32; 3],
}

impl PackedPoint {
    /// Build a point from a position and packed colour
    pub fn new(x: f32, y: f32, z: f32, rgb: f32) -> Self {
        Self {
            x,
            y,
            z,
            _pad0: 0,
            rgb,
            _pad1: [0; 3],
        }
    }
}

/// Pack an RGB colour triple into the float-bits wire representation
pub fn pack_rgb(r: u8, g: u8, b: u8) -> f32 {
    f32::from_bits(u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b))
}

/// Initialize a packed cloud message for a fixed camera resolution
///
/// Sets the field layout, dimensions and strides once; the payload is
/// rewritten on every publish cycle.
pub fn init_packed_message(frame_id: &str, width: u32, height: u32) -> PointCloudPacked {
    let fields = vec![
        PointField {
            name: "x".to_string(),
            offset: 0,
            datatype: FieldType::Float32,
            count: 1,
        },
        PointField {
            name: "y".to_string(),
            offset: 4,
            datatype: FieldType::Float32,
            count: 1,
        },
        PointField {
            name: "z".to_string(),
            offset: 8,
            datatype: FieldType::Float32,
            count: 1,
        },
        PointField {
            name: "rgb".to_string(),
            offset: 16,
            datatype: FieldType::Float32,
            count: 1,
        },
    ];

    PointCloudPacked {
        header: Header {
            frame_id: frame_id.to_string(),
            ..Header::default()
        },
        width,
        height,
        fields,
        point_step: POINT_STEP,
        row_step: POINT_STEP * width,
        is_bigendian: cfg!(target_endian = "big"),
        is_dense: false,
        data: Vec::new(),
    }
}

/// Extract the xyz triples from a raw interleaved cloud buffer
///
/// The renderer delivers `channels` floats per pixel with the position
/// in the first three; `xyz` must hold `width * height * 3` floats.
pub fn xyz_from_point_cloud(xyz: &mut [f32], cloud: &[f32], width: u32, height: u32, channels: u32) {
    let samples = (width * height) as usize;
    let channels = channels as usize;
    debug_assert!(cloud.len() >= samples * channels);
    debug_assert_eq!(xyz.len(), samples * 3);

    for i in 0..samples {
        let src = i * channels;
        let dst = i * 3;
        xyz[dst..dst + 3].copy_from_slice(&cloud[src..src + 3]);
    }
}

/// Fill the packed payload from an xyz buffer and an RGB image
///
/// Resizes the payload to `point_step * width * height` bytes and writes
/// one [`PackedPoint`] per pixel in row-major order.
pub fn fill_packed_message(msg: &mut PointCloudPacked, xyz: &[f32], rgb: &[u8]) {
    let samples = (msg.width * msg.height) as usize;
    let point_step = msg.point_step as usize;
    debug_assert_eq!(xyz.len(), samples * 3);
    debug_assert_eq!(rgb.len(), samples * 3);

    msg.data.resize(samples * point_step, 0);

    for (i, chunk) in msg.data.chunks_exact_mut(point_step).enumerate() {
        let p = i * 3;
        let point = PackedPoint::new(
            xyz[p],
            xyz[p + 1],
            xyz[p + 2],
            pack_rgb(rgb[p], rgb[p + 1], rgb[p + 2]),
        );
        chunk.copy_from_slice(bytemuck::bytes_of(&point));
    }
}

/// Read one point back out of a packed payload
pub fn read_point(msg: &PointCloudPacked, index: usize) -> PackedPoint {
    let point_step = msg.point_step as usize;
    let start = index * point_step;
    bytemuck::pod_read_unaligned(&msg.data[start..start + point_step])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn test_point_layout_matches_declared_fields() {
        assert_eq!(POINT_STEP, 32);
        assert_eq!(offset_of!(PackedPoint, x), 0);
        assert_eq!(offset_of!(PackedPoint, y), 4);
        assert_eq!(offset_of!(PackedPoint, z), 8);
        assert_eq!(offset_of!(PackedPoint, rgb), 16);

        let msg = init_packed_message("camera_optical_frame", 640, 480);
        for field in &msg.fields {
            let expected = match field.name.as_str() {
                "x" => 0,
                "y" => 4,
                "z" => 8,
                "rgb" => 16,
                other => panic!("unexpected field {}", other),
            };
            assert_eq!(field.offset, expected);
        }
        assert_eq!(msg.row_step, 32 * 640);
    }

    #[test]
    fn test_pack_rgb_bit_layout() {
        let packed = pack_rgb(0x12, 0x34, 0x56);
        assert_eq!(packed.to_bits(), 0x0012_3456);
    }

    #[test]
    fn test_xyz_extraction_skips_extra_channels() {
        // Two pixels, four channels each: xyz + packed colour.
        let cloud = vec![1.0f32, 2.0, 3.0, 9.0, 4.0, 5.0, 6.0, 9.0];
        let mut xyz = vec![0.0f32; 6];
        xyz_from_point_cloud(&mut xyz, &cloud, 2, 1, 4);
        assert_eq!(xyz, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_fill_writes_points_at_field_offsets() {
        let mut msg = init_packed_message("frame", 2, 1);
        let xyz = vec![1.0f32, 2.0, 3.0, -1.0, -2.0, -3.0];
        let rgb = vec![255u8, 0, 0, 0, 255, 0];
        fill_packed_message(&mut msg, &xyz, &rgb);

        assert_eq!(msg.data.len(), 64);
        let first = read_point(&msg, 0);
        assert_eq!((first.x, first.y, first.z), (1.0, 2.0, 3.0));
        assert_eq!(first.rgb.to_bits(), 0x00FF_0000);
        let second = read_point(&msg, 1);
        assert_eq!((second.x, second.y, second.z), (-1.0, -2.0, -3.0));
        assert_eq!(second.rgb.to_bits(), 0x0000_FF00);
    }
}
