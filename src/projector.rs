//! Bearing and camera-relative projection towards the parked car

use nalgebra::Vector3;

use crate::math::{DEG_TO_RAD, wrap_degrees};
use crate::types::{DirectionResult, GeoCoordinate, ProjectorSettings};

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Points closer than this are treated as the same place
const COINCIDENT_DISTANCE_M: f64 = 1e-6;

/// Initial great-circle bearing from `user` towards `target`
///
/// # Returns
/// Bearing in degrees in [0, 360), 0 = north, clockwise positive. Returns 0
/// when both points are the same place on the sphere (including the same
/// pole or antimeridian point written with different longitudes), where the
/// bearing is undefined.
///
/// # Example
/// ```
/// use park_compass::{GeoCoordinate, projector::bearing_to};
///
/// let origin = GeoCoordinate::new(0.0, 0.0).unwrap();
/// let east = GeoCoordinate::new(0.0, 1.0).unwrap();
/// assert!((bearing_to(&origin, &east) - 90.0).abs() < 1e-9);
/// assert_eq!(bearing_to(&origin, &origin), 0.0);
/// ```
pub fn bearing_to(user: &GeoCoordinate, target: &GeoCoordinate) -> f64 {
    if distance_meters(user, target) < COINCIDENT_DISTANCE_M {
        return 0.0;
    }

    let phi1 = user.latitude().to_radians();
    let phi2 = target.latitude().to_radians();
    let dlon = (target.longitude() - user.longitude()).to_radians();
    let y = dlon.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlon.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// Haversine distance between two coordinates in meters
pub fn distance_meters(user: &GeoCoordinate, target: &GeoCoordinate) -> f64 {
    let dlat = (target.latitude() - user.latitude()).to_radians();
    let dlon = (target.longitude() - user.longitude()).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + user.latitude().to_radians().cos()
            * target.latitude().to_radians().cos()
            * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// Signed angle from the device heading to the bearing, in (-180, 180]
///
/// Positive values mean the target is to the right. Wrapping keeps a
/// rotating arrow on the shortest path across north.
pub fn relative_angle(bearing: f32, device_azimuth: f32) -> f32 {
    wrap_degrees(bearing - device_azimuth)
}

/// Raw `bearing - device_azimuth` without wrapping, in (-360, 360)
pub fn relative_angle_unwrapped(bearing: f32, device_azimuth: f32) -> f32 {
    bearing - device_azimuth
}

/// Camera-relative offset for an AR marker
///
/// The camera looks down -Z with +X to the right. The marker is kept at
/// camera height (`y = 0`) at `distance_meters` from the camera.
///
/// # Example
/// ```
/// use park_compass::projector::project_to_camera;
///
/// let ahead = project_to_camera(0.0, 2.0);
/// assert_eq!(ahead, nalgebra::Vector3::new(0.0, 0.0, -2.0));
/// ```
pub fn project_to_camera(relative_angle_degrees: f32, distance_meters: f32) -> Vector3<f32> {
    let theta = relative_angle_degrees * DEG_TO_RAD;
    Vector3::new(distance_meters * theta.sin(), 0.0, -distance_meters * theta.cos())
}

/// 2D renderer collaborator orienting a compass arrow
pub trait CompassRenderer {
    /// Rotate the arrow by `degrees`, clockwise from straight up
    fn rotate_arrow(&mut self, degrees: f32);
}

/// 3D renderer collaborator placing the AR marker
///
/// The renderer composes the offset with the current camera pose to obtain a
/// world anchor. Pose and anchor objects never pass through this crate.
pub trait MarkerRenderer {
    /// Place the marker at `offset` from the camera
    fn place_marker(&mut self, offset: Vector3<f32>);
}

impl DirectionResult {
    /// Push the relative angle to a compass arrow
    pub fn render_compass<R: CompassRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.rotate_arrow(self.relative_angle_degrees);
    }

    /// Push the projected offset to an AR marker renderer
    pub fn render_marker<R: MarkerRenderer + ?Sized>(&self, renderer: &mut R) {
        renderer.place_marker(self.projected_offset);
    }
}

/// Turns (azimuth, user fix, target fix) into a renderable direction
///
/// Stateless apart from its settings; recompute whenever any input changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalProjector {
    settings: ProjectorSettings,
}

impl DirectionalProjector {
    /// Create a projector with default settings
    pub fn new() -> Self {
        Self::with_settings(ProjectorSettings::default())
    }

    /// Create a projector with the specified settings
    pub fn with_settings(settings: ProjectorSettings) -> Self {
        Self { settings }
    }

    /// Get current settings
    pub fn settings(&self) -> ProjectorSettings {
        self.settings
    }

    /// Compute the full direction from `user` to `target`
    ///
    /// # Arguments
    /// * `device_azimuth` - Smoothed device heading in degrees
    /// * `user` - Live user position
    /// * `target` - Saved parked position
    ///
    /// # Example
    /// ```
    /// use park_compass::{DirectionalProjector, GeoCoordinate};
    ///
    /// let projector = DirectionalProjector::new();
    /// let user = GeoCoordinate::new(51.1279, 1.3136).unwrap();
    /// let car = GeoCoordinate::new(51.1289, 1.3136).unwrap();
    ///
    /// let direction = projector.direction(0.0, &user, &car);
    /// assert!(direction.bearing_degrees.abs() < 1e-3);
    /// assert!((direction.projected_offset.z + 2.0).abs() < 1e-3);
    /// ```
    pub fn direction(&self, device_azimuth: f32, user: &GeoCoordinate, target: &GeoCoordinate) -> DirectionResult {
        let bearing = bearing_to(user, target) as f32;
        let relative = relative_angle(bearing, device_azimuth);

        DirectionResult {
            bearing_degrees: bearing,
            relative_angle_degrees: relative,
            projected_offset: project_to_camera(relative, self.settings.marker_distance_meters),
            distance_meters: distance_meters(user, target),
        }
    }
}
