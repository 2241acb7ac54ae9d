//! Core types and settings for the park-compass library

use nalgebra::Vector3;

use crate::error::{Error, Result};

/// Raw sensor channel a sample was produced by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SensorKind {
    /// Accelerometer, reading the gravity vector when the device is at rest
    Accelerometer,
    /// Magnetometer, reading the geomagnetic field vector
    Magnetometer,
}

/// One raw sample from the host sensor subsystem
///
/// Samples are consumed in arrival order and never retained beyond the
/// filter state. Values use the device frame: X to the right of the screen,
/// Y up the screen, Z out of the screen.
///
/// # Example
/// ```
/// use park_compass::{OrientationSample, SensorKind};
///
/// let sample = OrientationSample::accelerometer(0.0, 0.0, 9.81);
/// assert_eq!(sample.kind, SensorKind::Accelerometer);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationSample {
    /// Channel that produced the sample
    pub kind: SensorKind,
    /// Raw vector reading (m/s² for the accelerometer, µT for the magnetometer)
    pub values: Vector3<f32>,
}

impl OrientationSample {
    /// Create a sample for the given channel
    pub fn new(kind: SensorKind, values: Vector3<f32>) -> Self {
        Self { kind, values }
    }

    /// Accelerometer sample from its three components
    pub fn accelerometer(x: f32, y: f32, z: f32) -> Self {
        Self::new(SensorKind::Accelerometer, Vector3::new(x, y, z))
    }

    /// Magnetometer sample from its three components
    pub fn magnetometer(x: f32, y: f32, z: f32) -> Self {
        Self::new(SensorKind::Magnetometer, Vector3::new(x, y, z))
    }
}

/// Geographic position in decimal degrees (WGS84)
///
/// Used both for the live user fix and for the saved parked location.
///
/// # Example
/// ```
/// use park_compass::GeoCoordinate;
///
/// let dover = GeoCoordinate::new(51.1279, 1.3136).unwrap();
/// assert_eq!(dover.latitude(), 51.1279);
///
/// assert!(GeoCoordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedCoordinate"))]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

/// Deserialized form, validated through [`GeoCoordinate::new`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedCoordinate> for GeoCoordinate {
    type Error = Error;

    fn try_from(value: UncheckedCoordinate) -> Result<Self> {
        Self::new(value.latitude, value.longitude)
    }
}

impl GeoCoordinate {
    /// Create a coordinate, rejecting non-finite or out of range values
    ///
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees, positive north
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, positive east
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A live location fix together with its reported accuracy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    /// Reported position
    pub coordinate: GeoCoordinate,
    /// Horizontal accuracy radius in meters (larger is worse)
    pub accuracy_meters: f32,
}

impl LocationFix {
    /// Create a fix from a position and its accuracy radius
    pub fn new(coordinate: GeoCoordinate, accuracy_meters: f32) -> Self {
        Self {
            coordinate,
            accuracy_meters,
        }
    }
}

/// Device orientation angles derived from a rotation matrix
///
/// All angles are in radians. Azimuth is 0 at magnetic north and grows
/// clockwise, in the range (-π, π].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Rotation around the world up axis
    pub azimuth: f32,
    /// Rotation around the device X axis
    pub pitch: f32,
    /// Rotation around the device Y axis
    pub roll: f32,
}

/// Direction from the user to the parked car, ready to render
///
/// Derived on every input change and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionResult {
    /// Initial great-circle bearing from user to target, in [0, 360)
    pub bearing_degrees: f32,
    /// Bearing relative to where the device points, in (-180, 180]
    pub relative_angle_degrees: f32,
    /// Camera-relative marker offset in meters (X right, Y up, Z towards the viewer)
    pub projected_offset: Vector3<f32>,
    /// Great-circle distance from user to target in meters
    pub distance_meters: f64,
}

/// Heading estimator settings
///
/// # Example
/// ```
/// use park_compass::EstimatorSettings;
///
/// let settings = EstimatorSettings {
///     smoothing_factor: 0.9, // more responsive, more jitter
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EstimatorSettings {
    /// Exponential smoothing factor α applied to the raw vectors and to the azimuth
    ///
    /// `out = α·out + (1-α)·in`. Values close to 1 give a steadier but
    /// slower heading.
    pub smoothing_factor: f32,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.97,
        }
    }
}

/// Directional projector settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectorSettings {
    /// Distance from the camera at which the AR marker is placed
    ///
    /// The marker shows direction only. It stays at this fixed distance so
    /// it is always in view, whatever the real distance to the car.
    pub marker_distance_meters: f32,
}

impl Default for ProjectorSettings {
    fn default() -> Self {
        Self {
            marker_distance_meters: 2.0,
        }
    }
}

/// Car finder settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FinderSettings {
    /// Live fixes with an accuracy radius above this are discarded
    pub max_fix_accuracy_meters: f32,
    /// Projection settings for the AR marker
    pub projector: ProjectorSettings,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            max_fix_accuracy_meters: 30.0,
            projector: ProjectorSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(GeoCoordinate::new(0.0, 0.0).is_ok());
        assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());

        assert_eq!(
            GeoCoordinate::new(90.5, 0.0),
            Err(Error::InvalidCoordinate {
                latitude: 90.5,
                longitude: 0.0
            })
        );
        assert!(GeoCoordinate::new(0.0, -180.1).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_sample_constructors() {
        let accel = OrientationSample::accelerometer(1.0, 2.0, 3.0);
        assert_eq!(accel.kind, SensorKind::Accelerometer);
        assert_eq!(accel.values, Vector3::new(1.0, 2.0, 3.0));

        let mag = OrientationSample::magnetometer(4.0, 5.0, 6.0);
        assert_eq!(mag.kind, SensorKind::Magnetometer);
        assert_eq!(mag.values, Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_default_settings() {
        assert_eq!(EstimatorSettings::default().smoothing_factor, 0.97);
        assert_eq!(ProjectorSettings::default().marker_distance_meters, 2.0);

        let finder = FinderSettings::default();
        assert_eq!(finder.max_fix_accuracy_meters, 30.0);
        assert_eq!(finder.projector, ProjectorSettings::default());
    }
}
