// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the configuration types

use depth_camera::config::{CameraSettings, DepthCameraConfig, NoiseKind, SensorKind};

#[test]
fn test_config_default() {
    let config = DepthCameraConfig::default();

    assert_eq!(config.kind, SensorKind::DepthCamera);
    assert!(config.topic.is_empty(), "Topic should default to empty");
    assert!(config.camera.is_none());

    let settings = CameraSettings::default();
    assert_eq!(settings.image_width, 640);
    assert_eq!(settings.image_height, 480);
    assert!(settings.clip.near < settings.clip.far);
    assert_eq!(settings.noise.kind, NoiseKind::None);
    assert!(settings.intrinsics.is_none());
    assert!(settings.save_frames.is_none());
}

#[test]
fn test_config_serde_round_trip() {
    let config = DepthCameraConfig {
        name: "bench_camera".to_string(),
        topic: "/bench/depth".to_string(),
        kind: SensorKind::DepthCamera,
        camera: Some(CameraSettings {
            image_width: 320,
            image_height: 240,
            horizontal_fov: 1.57,
            ..CameraSettings::default()
        }),
    };

    let json = serde_json::to_string(&config).expect("serialize");
    let parsed: DepthCameraConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, config);
}
