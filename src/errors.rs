// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the depth camera sensor

use std::fmt;
use std::path::PathBuf;

/// Result type alias using SensorError
pub type SensorResult<T> = Result<T, SensorError>;

/// Main sensor error type
#[derive(Debug, Clone)]
pub enum SensorError {
    /// Configuration errors, fatal to sensor creation
    Config(ConfigError),
    /// The rendering camera does not exist (no scene set, or camera
    /// creation failed); the tick aborts but the sensor stays usable
    CameraMissing,
    /// Frame saving errors
    Save(SaveError),
}

/// Configuration-specific errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The configuration declares a sensor kind other than depth camera
    WrongSensorKind(String),
    /// The configuration carries no camera block
    MissingCameraConfig,
    /// Horizontal field of view outside the accepted range
    InvalidHorizontalFov(f64),
    /// The transport refused to register a publisher
    PublisherRegistration {
        /// Topic the registration was attempted on
        topic: String,
        /// Reason reported by the transport
        reason: String,
    },
}

/// Frame saving errors
#[derive(Debug, Clone)]
pub enum SaveError {
    /// The output directory could not be created
    DirectoryCreation {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error message
        reason: String,
    },
    /// Zero-sized frames cannot be saved
    InvalidDimensions {
        /// Frame width in pixels
        width: u32,
        /// Frame height in pixels
        height: u32,
    },
    /// PNG encoding or writing failed
    Encoding(String),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Config(e) => write!(f, "Configuration error: {}", e),
            SensorError::CameraMissing => write!(f, "Camera doesn't exist"),
            SensorError::Save(e) => write!(f, "Save error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::WrongSensorKind(kind) => {
                write!(
                    f,
                    "Attempting to load a depth camera sensor, but received a {}",
                    kind
                )
            }
            ConfigError::MissingCameraConfig => {
                write!(
                    f,
                    "Attempting to load a depth camera sensor, but received a null camera"
                )
            }
            ConfigError::InvalidHorizontalFov(fov) => {
                write!(f, "Invalid horizontal field of view [{}]", fov)
            }
            ConfigError::PublisherRegistration { topic, reason } => {
                write!(f, "Unable to create publisher on topic [{}]: {}", topic, reason)
            }
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::DirectoryCreation { path, reason } => {
                write!(f, "Failed to create directory {}: {}", path.display(), reason)
            }
            SaveError::InvalidDimensions { width, height } => {
                write!(f, "Invalid frame dimensions {}x{}", width, height)
            }
            SaveError::Encoding(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for SensorError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for SaveError {}

impl From<ConfigError> for SensorError {
    fn from(err: ConfigError) -> Self {
        SensorError::Config(err)
    }
}

impl From<SaveError> for SensorError {
    fn from(err: SaveError) -> Self {
        SensorError::Save(err)
    }
}
