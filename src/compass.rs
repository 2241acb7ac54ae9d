//! Tilt-compensated compass from gravity and geomagnetic vectors

use nalgebra::{Matrix3, Vector3};

use crate::math::RAD_TO_DEG;
use crate::types::Orientation;

/// Standard gravity in m/s²
const STANDARD_GRAVITY: f32 = 9.81;

/// Gravity magnitudes below 10% of standard gravity mean free fall
const FREE_FALL_GRAVITY_SQUARED: f32 = 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY;

/// Minimum magnitude of the horizontal (east) vector, in µT·m/s²
///
/// Typical values are above 100. Smaller values mean gravity and the
/// geomagnetic field are nearly parallel (close to the magnetic pole).
const MIN_EAST_MAGNITUDE: f32 = 0.1;

/// Compute the device-to-world rotation matrix
///
/// The world frame has X pointing east, Y pointing magnetic north and Z up.
/// Rows of the returned matrix are the world axes expressed in device
/// coordinates: `[east; north; up]`.
///
/// Returns `None` when the geometry is degenerate: the device is in free
/// fall, or gravity and the geomagnetic field are (nearly) parallel.
///
/// # Arguments
/// * `gravity` - Smoothed accelerometer reading in m/s²
/// * `geomagnetic` - Smoothed magnetometer reading in µT
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use park_compass::compass::rotation_matrix;
///
/// let gravity = Vector3::new(0.0, 0.0, 9.81);
/// let geomagnetic = Vector3::new(0.0, 20.0, -40.0);
/// assert!(rotation_matrix(gravity, geomagnetic).is_some());
///
/// // Parallel vectors carry no heading information
/// assert!(rotation_matrix(gravity, Vector3::new(0.0, 0.0, -40.0)).is_none());
/// ```
pub fn rotation_matrix(gravity: Vector3<f32>, geomagnetic: Vector3<f32>) -> Option<Matrix3<f32>> {
    let gravity_squared = gravity.magnitude_squared();
    if !gravity_squared.is_finite() || gravity_squared < FREE_FALL_GRAVITY_SQUARED {
        return None;
    }

    // East is perpendicular to both the field and gravity
    let east = geomagnetic.cross(&gravity);
    let east_magnitude = east.magnitude();
    if !east_magnitude.is_finite() || east_magnitude < MIN_EAST_MAGNITUDE {
        return None;
    }

    let east = east / east_magnitude;
    let up = gravity.normalize();
    let north = up.cross(&east);

    Some(Matrix3::from_rows(&[
        east.transpose(),
        north.transpose(),
        up.transpose(),
    ]))
}

/// Extract azimuth, pitch and roll from a rotation matrix
///
/// Azimuth is the angle of the device Y axis projected on the horizontal
/// plane, measured clockwise from magnetic north.
pub fn orientation(rotation: &Matrix3<f32>) -> Orientation {
    Orientation {
        azimuth: rotation[(0, 1)].atan2(rotation[(1, 1)]),
        pitch: (-rotation[(2, 1)]).clamp(-1.0, 1.0).asin(),
        roll: (-rotation[(2, 0)]).atan2(rotation[(2, 2)]),
    }
}

/// Calculate the raw compass azimuth in degrees
///
/// # Returns
/// Azimuth in degrees (range: -180° to +180°, 0° = magnetic north,
/// clockwise positive), or `None` for degenerate geometry.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use park_compass::compass::calculate_azimuth;
///
/// let gravity = Vector3::new(0.0, 0.0, 9.81);   // Lying flat
/// let geomagnetic = Vector3::new(-20.0, 0.0, -40.0); // North is to the left
/// let azimuth = calculate_azimuth(gravity, geomagnetic).unwrap();
/// assert!((azimuth - 90.0).abs() < 1e-3);        // Top of the phone faces east
/// ```
pub fn calculate_azimuth(gravity: Vector3<f32>, geomagnetic: Vector3<f32>) -> Option<f32> {
    rotation_matrix(gravity, geomagnetic).map(|rotation| orientation(&rotation).azimuth * RAD_TO_DEG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    /// Gravity reaction as seen by a device at rest, in world coordinates
    fn world_gravity() -> Vector3<f32> {
        Vector3::new(0.0, 0.0, 9.81)
    }

    /// Magnetic field pointing north and dipping down, as in northern Europe
    fn world_field() -> Vector3<f32> {
        Vector3::new(0.0, 20.0, -40.0)
    }

    /// Readings of a device turned to `heading` degrees and pitched up by `pitch` degrees
    fn device_readings(heading: f32, pitch: f32) -> (Vector3<f32>, Vector3<f32>) {
        let attitude = Rotation3::from_axis_angle(&Vector3::z_axis(), -heading.to_radians())
            * Rotation3::from_axis_angle(&Vector3::x_axis(), pitch.to_radians());
        let to_device = attitude.inverse();
        (to_device * world_gravity(), to_device * world_field())
    }

    fn angle_difference(a: f32, b: f32) -> f32 {
        crate::math::wrap_degrees(a - b).abs()
    }

    #[test]
    fn test_compass_cardinal_directions() {
        for (heading, name) in [(0.0, "North"), (90.0, "East"), (180.0, "South"), (-90.0, "West")] {
            let (gravity, field) = device_readings(heading, 0.0);
            let azimuth = calculate_azimuth(gravity, field).unwrap();
            assert!(
                angle_difference(azimuth, heading) < 0.01,
                "{} heading should be ~{}°, got {}",
                name,
                heading,
                azimuth
            );
        }
    }

    #[test]
    fn test_compass_tilt_compensation() {
        let (level_gravity, level_field) = device_readings(30.0, 0.0);
        let level = calculate_azimuth(level_gravity, level_field).unwrap();

        // Held upright in front of the face, as when looking through the camera
        let (tilted_gravity, tilted_field) = device_readings(30.0, 60.0);
        let tilted = calculate_azimuth(tilted_gravity, tilted_field).unwrap();

        assert!(
            angle_difference(level, tilted) < 0.01,
            "Tilt compensation failed: level={:.2}°, tilted={:.2}°",
            level,
            tilted
        );
    }

    #[test]
    fn test_compass_azimuth_range() {
        for heading in (-179..=180).step_by(15) {
            let (gravity, field) = device_readings(heading as f32, 20.0);
            let azimuth = calculate_azimuth(gravity, field).unwrap();

            assert!(
                azimuth > -180.0 - 1e-3 && azimuth <= 180.0 + 1e-3,
                "Azimuth {:.1}° out of range for heading {}°",
                azimuth,
                heading
            );
            assert!(angle_difference(azimuth, heading as f32) < 0.01);
        }
    }

    #[test]
    fn test_free_fall_is_degenerate() {
        let gravity = Vector3::new(0.0, 0.0, 0.5);
        assert!(rotation_matrix(gravity, world_field()).is_none());
        assert!(calculate_azimuth(Vector3::zeros(), world_field()).is_none());
    }

    #[test]
    fn test_parallel_vectors_are_degenerate() {
        let gravity = Vector3::new(0.0, 0.0, 9.81);
        assert!(rotation_matrix(gravity, Vector3::new(0.0, 0.0, 45.0)).is_none());
        assert!(rotation_matrix(gravity, Vector3::zeros()).is_none());
    }

    #[test]
    fn test_non_finite_input_is_degenerate() {
        let gravity = Vector3::new(0.0, 0.0, 9.81);
        assert!(rotation_matrix(gravity, Vector3::new(f32::NAN, 20.0, -40.0)).is_none());

        let tilted = Vector3::new(1.0, 1.0, 9.81);
        assert!(rotation_matrix(tilted, Vector3::new(f32::INFINITY, 20.0, -40.0)).is_none());
        assert!(rotation_matrix(Vector3::new(f32::INFINITY, 0.0, 9.81), Vector3::new(0.0, 20.0, -40.0)).is_none());
    }

    #[test]
    fn test_rotation_matrix_is_orthonormal() {
        let (gravity, field) = device_readings(123.0, 35.0);
        let rotation = rotation_matrix(gravity, field).unwrap();
        let product = rotation * rotation.transpose();

        assert!((product - Matrix3::identity()).abs().max() < 1e-5);
    }

    #[test]
    fn test_orientation_pitch_and_roll() {
        let (gravity, field) = device_readings(0.0, 30.0);
        let angles = orientation(&rotation_matrix(gravity, field).unwrap());

        // Tilting the top of the device up gives a negative pitch
        assert!((angles.pitch * RAD_TO_DEG + 30.0).abs() < 0.01);
        assert!(angles.roll.abs() < 1e-4);
    }
}
