// SPDX-License-Identifier: GPL-3.0-only

//! Camera noise registry
//!
//! The sensor only carries the noise description; evaluation happens in
//! the renderer. Gaussian is the only supported kind, anything else
//! declared in the configuration is skipped with a warning.

use std::collections::HashMap;
use tracing::warn;

use crate::config::{NoiseConfig, NoiseKind};

/// Point in the sensor pipeline a noise model applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorNoiseType {
    /// Noise applied to the camera image
    CameraNoise,
}

/// A constructed noise model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageNoiseModel {
    /// Per-pixel Gaussian noise
    Gaussian {
        /// Mean of the distribution
        mean: f64,
        /// Standard deviation of the distribution
        stddev: f64,
    },
}

/// Build the noise registry from the configured descriptor
///
/// Populated once at camera creation and immutable afterwards. An
/// unsupported kind yields an empty entry, not an error.
pub fn build_noise_registry(noise: &NoiseConfig) -> HashMap<SensorNoiseType, ImageNoiseModel> {
    let mut registry = HashMap::new();
    match noise.kind {
        NoiseKind::None => {}
        NoiseKind::Gaussian => {
            registry.insert(
                SensorNoiseType::CameraNoise,
                ImageNoiseModel::Gaussian {
                    mean: noise.mean,
                    stddev: noise.stddev,
                },
            );
        }
        other => {
            warn!(
                kind = ?other,
                "The depth camera sensor only supports Gaussian noise; the supplied noise type is not supported"
            );
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_noise_is_registered() {
        let registry = build_noise_registry(&NoiseConfig {
            kind: NoiseKind::Gaussian,
            mean: 0.1,
            stddev: 0.02,
        });
        assert_eq!(
            registry.get(&SensorNoiseType::CameraNoise),
            Some(&ImageNoiseModel::Gaussian {
                mean: 0.1,
                stddev: 0.02
            })
        );
    }

    #[test]
    fn test_none_and_unsupported_kinds_are_skipped() {
        let registry = build_noise_registry(&NoiseConfig::default());
        assert!(registry.is_empty());

        let registry = build_noise_registry(&NoiseConfig {
            kind: NoiseKind::GaussianQuantized,
            mean: 0.0,
            stddev: 0.1,
        });
        assert!(registry.is_empty());
    }
}
