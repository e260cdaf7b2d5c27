//! Error types for the HAL crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in device lookup and provider configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// No device with this id, or no provider able to serve it.
    #[error("Device {0} not found.")]
    DeviceNotFound(String),

    /// A catalog entry exists but lacks data needed to load the device.
    #[error("Failed to load device due to invalid device data: {0}")]
    ResourceNotFound(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml_ng::Error),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
