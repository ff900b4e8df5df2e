// SPDX-License-Identifier: GPL-3.0-only

//! Depth camera sensor
//!
//! Orchestrates the whole pipeline: configures a rendering camera from
//! the sensor configuration, captures the frames its render passes
//! produce, and publishes a depth image plus a packed point cloud on
//! every update tick.
//!
//! Two actors share the frame buffers: the renderer invokes the capture
//! callbacks from its own threads, and the caller drives `update`
//! synchronously. One mutex serializes both; `render` is expected to
//! deliver fresh frames to the callbacks before it returns. Concurrent
//! ticks on the same sensor are not supported.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::buffers::FrameBufferStore;
use crate::bus::{Bus, InfoPublisher, Publisher};
use crate::config::{
    CameraSettings, DEFAULT_TOPIC, DepthCameraConfig, LensIntrinsics, SensorKind,
};
use crate::depth_image;
use crate::errors::{ConfigError, SensorError, SensorResult};
use crate::msgs::{DepthImage, Header, PixelFormat, PointCloudPacked};
use crate::noise::{self, ImageNoiseModel, SensorNoiseType};
use crate::point_cloud;
use crate::projection;
use crate::render::{DepthRenderCamera, Scene};
use crate::saver::FrameSaver;

/// Direct depth image subscriber invoked once per tick
pub type ImageCallback = Box<dyn FnMut(&DepthImage) + Send>;

/// Handle identifying a registered [`ImageCallback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackId(u64);

/// State shared between the capture callbacks and the update tick
struct SensorShared {
    store: FrameBufferStore,
    saver: Option<FrameSaver>,
}

/// A depth camera sensor
///
/// Created against a [`Bus`], attached to a [`Scene`], and driven by
/// external `update` ticks.
pub struct DepthCameraSensor {
    name: String,
    topic: String,
    frame_id: String,
    settings: CameraSettings,
    depth_pub: Box<dyn Publisher<DepthImage>>,
    point_pub: Box<dyn Publisher<PointCloudPacked>>,
    info_pub: Option<Box<dyn InfoPublisher>>,
    camera: Option<Box<dyn DepthRenderCamera>>,
    shared: Arc<Mutex<SensorShared>>,
    image_callbacks: Vec<(CallbackId, ImageCallback)>,
    next_callback_id: u64,
    depth_sequence: u64,
    point_sequence: u64,
    // Tracked separately from the camera: occlusion detection needs
    // geometry rendered in front of the nominal near plane.
    near: f64,
    intrinsics: Option<LensIntrinsics>,
    noises: HashMap<SensorNoiseType, ImageNoiseModel>,
}

impl DepthCameraSensor {
    /// Create a sensor from its configuration, registering both
    /// publishers on the transport
    ///
    /// Fails on a wrong sensor kind, a missing camera block, or a
    /// refused publisher registration. The rendering camera is created
    /// separately via [`Self::set_scene`].
    pub fn new(config: DepthCameraConfig, bus: &mut dyn Bus) -> SensorResult<Self> {
        if config.kind != SensorKind::DepthCamera {
            error!(kind = %config.kind, "Attempting to load a depth camera sensor, but received another kind");
            return Err(ConfigError::WrongSensorKind(config.kind.to_string()).into());
        }

        let Some(settings) = config.camera else {
            error!("Attempting to load a depth camera sensor, but received a null camera");
            return Err(ConfigError::MissingCameraConfig.into());
        };

        let topic = if config.topic.is_empty() {
            DEFAULT_TOPIC.to_string()
        } else {
            config.topic
        };

        let depth_pub =
            bus.advertise_depth(&topic)
                .map_err(|reason| ConfigError::PublisherRegistration {
                    topic: topic.clone(),
                    reason,
                })?;
        debug!(name = %config.name, topic = %topic, "Depth images advertised");

        let points_topic = format!("{}/points", topic);
        let point_pub =
            bus.advertise_points(&points_topic)
                .map_err(|reason| ConfigError::PublisherRegistration {
                    topic: points_topic.clone(),
                    reason,
                })?;
        debug!(name = %config.name, topic = %points_topic, "Points advertised");

        let near = settings.clip.near;
        Ok(Self {
            frame_id: format!("{}_optical_frame", config.name),
            name: config.name,
            topic,
            settings,
            depth_pub,
            point_pub,
            info_pub: None,
            camera: None,
            shared: Arc::new(Mutex::new(SensorShared {
                store: FrameBufferStore::new(),
                saver: None,
            })),
            image_callbacks: Vec::new(),
            next_callback_id: 0,
            depth_sequence: 0,
            point_sequence: 0,
            near,
            intrinsics: None,
            noises: HashMap::new(),
        })
    }

    /// Attach the sensor to a scene, (re)creating its rendering camera
    ///
    /// Scene reassignment drops the current camera first; a failed
    /// creation leaves the sensor without one until the next call.
    pub fn set_scene(&mut self, scene: &mut dyn Scene) -> SensorResult<()> {
        self.camera = None;
        self.create_camera(scene)
    }

    /// Attach the out-of-scope metadata publisher
    pub fn set_info_publisher(&mut self, publisher: Box<dyn InfoPublisher>) {
        self.info_pub = Some(publisher);
    }

    /// Configure a new rendering camera from the held settings
    fn create_camera(&mut self, scene: &mut dyn Scene) -> SensorResult<()> {
        let settings = self.settings.clone();
        let width = settings.image_width;
        let height = settings.image_height;

        let hfov = settings.horizontal_fov;
        if hfov < 0.01 || hfov > std::f64::consts::TAU {
            error!(fov = hfov, "Invalid horizontal field of view");
            return Err(ConfigError::InvalidHorizontalFov(hfov).into());
        }

        let mut camera = scene.create_depth_camera(&self.name);
        camera.set_image_width(width);
        camera.set_image_height(height);
        camera.set_near_clip(settings.clip.near);
        camera.set_far_clip(settings.clip.far);
        camera.set_visibility_mask(settings.visibility_mask);

        self.noises = noise::build_noise_registry(&settings.noise);
        if let Some(ImageNoiseModel::Gaussian { mean, stddev }) =
            self.noises.get(&SensorNoiseType::CameraNoise)
        {
            camera.set_image_gaussian_noise(*mean, *stddev);
        }

        self.near = settings.clip.near;

        camera.set_anti_aliasing(settings.anti_aliasing);
        camera.set_aspect_ratio(f64::from(width) / f64::from(height));
        camera.set_horizontal_fov(hfov);

        match settings.intrinsics {
            // No explicit intrinsics: recover them from the renderer's
            // default symmetric projection so they are observable either
            // way.
            None => {
                self.intrinsics = Some(projection::projection_to_intrinsics(
                    &camera.projection_matrix(),
                    width,
                    height,
                ));
            }
            Some(intrinsics) => {
                let matrix = projection::build_projection_matrix(
                    f64::from(width),
                    f64::from(height),
                    intrinsics.fx,
                    intrinsics.fy,
                    intrinsics.cx,
                    intrinsics.cy,
                    intrinsics.skew,
                    camera.near_clip(),
                    camera.far_clip(),
                );
                camera.set_projection_matrix(matrix);
                self.intrinsics = Some(intrinsics);
            }
        }

        camera.create_depth_texture();

        {
            let mut shared = self.shared.lock().unwrap();
            shared.store.point_msg = point_cloud::init_packed_message(&self.frame_id, width, height);
            shared.saver = settings
                .save_frames
                .as_ref()
                .map(|save| FrameSaver::new(save.path.clone(), format!("{}_", self.name)));
        }

        let shared = Arc::clone(&self.shared);
        camera.connect_depth_frame(Box::new(move |data, frame_width, frame_height, _channels| {
            let mut shared = shared.lock().unwrap();
            let shared = &mut *shared;
            shared.store.capture_depth(data, frame_width, frame_height);
            if let Some(saver) = shared.saver.as_mut() {
                if let Err(e) = saver.save_depth(data, frame_width, frame_height) {
                    error!(error = %e, "Failed to save depth frame");
                }
            }
        }));

        let shared = Arc::clone(&self.shared);
        camera.connect_point_cloud(Box::new(move |data, frame_width, frame_height, channels| {
            shared
                .lock()
                .unwrap()
                .store
                .capture_cloud(data, frame_width, frame_height, channels);
        }));

        self.camera = Some(camera);
        Ok(())
    }

    /// Run one update tick, publishing for the given timestamp
    ///
    /// Without any depth or point subscriber the tick renders nothing
    /// and returns immediately. A panic in a direct image callback is
    /// reported and isolated; it never reaches the caller or the other
    /// subscribers.
    pub fn update(&mut self, now: Duration) -> SensorResult<()> {
        let Some(camera) = self.camera.as_mut() else {
            error!("Camera doesn't exist, update ignored");
            return Err(SensorError::CameraMissing);
        };

        if let Some(info) = self.info_pub.as_mut() {
            if info.has_subscribers() {
                info.publish(now);
            }
        }

        let has_depth = self.depth_pub.has_subscribers() || !self.image_callbacks.is_empty();
        let has_points = self.point_pub.has_subscribers();
        if !has_depth && !has_points {
            return Ok(());
        }

        // Generate sensor data; the capture callbacks run before this
        // returns.
        camera.render();

        let width = camera.image_width();
        let height = camera.image_height();

        let mut msg = DepthImage {
            header: Header {
                stamp: now,
                sequence: self.depth_sequence,
                frame_id: self.frame_id.clone(),
            },
            width,
            height,
            step: width * PixelFormat::R32Float.bytes_per_pixel(),
            pixel_format: PixelFormat::R32Float,
            data: Vec::new(),
        };

        let mut shared = self.shared.lock().unwrap();
        let shared = &mut *shared;

        {
            let Some(depth) = shared.store.depth() else {
                warn!("No depth frame captured yet, skipping publish");
                return Ok(());
            };
            msg.data.extend_from_slice(depth);
        }

        self.depth_sequence += 1;
        self.depth_pub.publish(&msg);

        for (id, callback) in self.image_callbacks.iter_mut() {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(&msg))).is_err() {
                error!(callback = id.0, "Panic in an image callback");
            }
        }

        if has_points {
            let store = &mut shared.store;
            if let Some(channels) = store.cloud_channels() {
                store.point_msg.header.stamp = now;
                store.point_msg.is_dense = true;

                store.ensure_derived(width, height);
                point_cloud::xyz_from_point_cloud(
                    &mut store.xyz,
                    &store.cloud,
                    width,
                    height,
                    channels,
                );
                depth_image::depth_to_image(&store.depth, &mut store.image);
                point_cloud::fill_packed_message(&mut store.point_msg, &store.xyz, &store.image);

                store.point_msg.header.sequence = self.point_sequence;
                self.point_sequence += 1;
                self.point_pub.publish(&store.point_msg);
            }
        }

        Ok(())
    }

    /// Register a direct depth image callback, invoked once per tick
    pub fn connect_image_callback(&mut self, callback: ImageCallback) -> CallbackId {
        let id = CallbackId(self.next_callback_id);
        self.next_callback_id += 1;
        self.image_callbacks.push((id, callback));
        id
    }

    /// Remove a previously registered image callback
    pub fn disconnect_image_callback(&mut self, id: CallbackId) -> bool {
        let before = self.image_callbacks.len();
        self.image_callbacks.retain(|(cb_id, _)| *cb_id != id);
        self.image_callbacks.len() != before
    }

    /// Sensor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Depth image topic
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Frame the published data is expressed in
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Image width in pixels
    pub fn image_width(&self) -> u32 {
        self.camera
            .as_ref()
            .map_or(self.settings.image_width, |c| c.image_width())
    }

    /// Image height in pixels
    pub fn image_height(&self) -> u32 {
        self.camera
            .as_ref()
            .map_or(self.settings.image_height, |c| c.image_height())
    }

    /// Nominal near clip distance
    pub fn near_clip(&self) -> f64 {
        self.near
    }

    /// Far clip distance
    pub fn far_clip(&self) -> f64 {
        self.camera
            .as_ref()
            .map_or(self.settings.clip.far, |c| c.far_clip())
    }

    /// Lens intrinsics resolved at camera creation
    ///
    /// `None` until a camera has been created; afterwards always set,
    /// whether they were configured explicitly or recovered from the
    /// renderer's default projection.
    pub fn lens_intrinsics(&self) -> Option<LensIntrinsics> {
        self.intrinsics
    }

    /// True when a depth subscriber (transport or direct callback)
    /// is connected
    pub fn has_depth_subscribers(&self) -> bool {
        self.depth_pub.has_subscribers() || !self.image_callbacks.is_empty()
    }

    /// True when a point cloud subscriber is connected
    pub fn has_point_subscribers(&self) -> bool {
        self.point_pub.has_subscribers()
    }

    /// True when anything at all consumes this sensor's output
    pub fn has_connections(&self) -> bool {
        self.has_depth_subscribers()
            || self.has_point_subscribers()
            || self
                .info_pub
                .as_ref()
                .is_some_and(|info| info.has_subscribers())
    }
}
