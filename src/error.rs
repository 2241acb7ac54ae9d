//! Error types for the park-compass library

use thiserror::Error;

/// Errors reported by the car finder core
///
/// Degenerate sensor geometry, missing sensors and inaccurate location fixes
/// are not errors: they leave the previous state in place. Only invalid
/// input values and failures reported by external collaborators surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Latitude or longitude outside the valid range, or not finite
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// The host sensor source refused the subscription
    #[error("Sensor subscription failed: {0}")]
    SensorSubscription(String),

    /// The parked location store failed to read or write the record
    #[error("Parked location store error: {0}")]
    Store(String),
}

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, Error>;
