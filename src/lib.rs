//! park-compass - heading estimation and direction projection for finding a parked car
//!
//! This library turns raw accelerometer and magnetometer samples into a
//! smoothed compass azimuth, and turns (azimuth, live position, saved
//! position) into a direction to render: a rotation for a 2D compass arrow,
//! or a camera-relative offset for an AR marker.
//!
//! # Features
//!
//! - Two-stage exponential heading filter (raw vectors, then azimuth)
//! - Tilt-compensated rotation matrix with degenerate geometry rejection
//! - Explicit sensor subscription lifecycle with a scoped guard
//! - Great-circle bearing and haversine distance
//! - Shortest-path relative angle and fixed-distance AR projection
//! - Accuracy gate for live location fixes
//! - Optional `serde` support for settings
//!
//! # Quick Start
//!
//! ```rust
//! use park_compass::{DirectionalProjector, GeoCoordinate, HeadingFilter, OrientationSample};
//!
//! let mut filter = HeadingFilter::new();
//!
//! // Sensor readings (m/s² and µT), device lying flat with its top facing north
//! filter.update(&OrientationSample::accelerometer(0.0, 0.0, 9.81));
//! filter.update(&OrientationSample::magnetometer(0.0, 20.0, -40.0));
//!
//! let azimuth = filter.azimuth();
//!
//! let user = GeoCoordinate::new(51.1279, 1.3136).unwrap();
//! let car = GeoCoordinate::new(51.1289, 1.3136).unwrap();
//! let direction = DirectionalProjector::new().direction(azimuth, &user, &car);
//!
//! // Car straight ahead, marker 2 m in front of the camera
//! assert!(direction.relative_angle_degrees.abs() < 1e-3);
//! assert!((direction.projected_offset.z + 2.0).abs() < 1e-3);
//! ```

pub mod compass;
mod error;
mod estimator;
mod finder;
mod math;
pub mod projector;
mod store;
mod types;

pub use error::{Error, Result};
pub use estimator::{FilterState, HeadingEstimator, HeadingFilter, ListenerId, Listening, SensorSource};
pub use finder::{CarFinder, FixGate};
pub use math::{DEG_TO_RAD, LowPass, RAD_TO_DEG, normalize_degrees, wrap_degrees};
pub use projector::{CompassRenderer, DirectionalProjector, MarkerRenderer};
pub use store::{MemoryStore, PARKED_LOCATION_ID, ParkedLocationStore};
pub use types::*;
