// SPDX-License-Identifier: GPL-3.0-only

//! Pub/sub transport boundary
//!
//! Publication is fire-and-forget: no acknowledgement or backpressure
//! flows back from subscribers. The only feedback the sensor uses is
//! `has_subscribers`, which gates whether a tick renders at all.

use std::time::Duration;

use crate::msgs::{DepthImage, PointCloudPacked};

/// A topic publisher handed out by the transport
pub trait Publisher<M>: Send {
    /// Publish one message
    fn publish(&self, message: &M);
    /// True when at least one subscriber is connected
    fn has_subscribers(&self) -> bool;
}

/// Transport node able to register the sensor's publishers
pub trait Bus {
    /// Register the depth image publisher
    fn advertise_depth(&mut self, topic: &str) -> Result<Box<dyn Publisher<DepthImage>>, String>;
    /// Register the point cloud publisher
    fn advertise_points(
        &mut self,
        topic: &str,
    ) -> Result<Box<dyn Publisher<PointCloudPacked>>, String>;
}

/// Hook for the out-of-scope sensor-metadata collaborator
///
/// When attached, the sensor delegates metadata publication to it once
/// per tick before any depth work happens.
pub trait InfoPublisher: Send {
    /// True when at least one subscriber is connected
    fn has_subscribers(&self) -> bool;
    /// Publish the metadata message for the given tick time
    fn publish(&mut self, stamp: Duration);
}
