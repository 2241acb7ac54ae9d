//! Angle helpers and nalgebra extensions for the park-compass library

use nalgebra::Vector3;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Normalize an angle in degrees into [0, 360)
///
/// # Example
/// ```
/// use park_compass::normalize_degrees;
///
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(360.0), 0.0);
/// ```
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap an angle in degrees into (-180, 180]
///
/// # Example
/// ```
/// use park_compass::wrap_degrees;
///
/// assert_eq!(wrap_degrees(270.0), -90.0);
/// assert_eq!(wrap_degrees(-180.0), 180.0);
/// ```
pub fn wrap_degrees(degrees: f32) -> f32 {
    let normalized = normalize_degrees(degrees);
    if normalized > 180.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

/// Extension trait for exponential smoothing of sensor vectors
pub trait LowPass {
    /// One step of `out = α·self + (1-α)·raw`, applied per channel
    fn low_pass(&self, raw: &Self, alpha: f32) -> Self;
}

impl LowPass for Vector3<f32> {
    fn low_pass(&self, raw: &Self, alpha: f32) -> Self {
        Vector3::new(
            alpha * self.x + (1.0 - alpha) * raw.x,
            alpha * self.y + (1.0 - alpha) * raw.y,
            alpha * self.z + (1.0 - alpha) * raw.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(359.5), 359.5);
        assert_eq!(normalize_degrees(720.0 + 45.0), 45.0);
        assert_eq!(normalize_degrees(-45.0), 315.0);
        assert_eq!(normalize_degrees(-1e-9), 0.0);
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(181.0), -179.0);
        assert_eq!(wrap_degrees(-181.0), 179.0);
        assert_eq!(wrap_degrees(350.0), -10.0);
        assert_eq!(wrap_degrees(-350.0), 10.0);
    }

    #[test]
    fn test_low_pass_vector() {
        let smoothed = Vector3::new(1.0f32, 0.0, 0.0);
        let raw = Vector3::new(0.0f32, 1.0, 2.0);
        let out = smoothed.low_pass(&raw, 0.97);

        assert!((out.x - 0.97).abs() < 1e-6);
        assert!((out.y - 0.03).abs() < 1e-6);
        assert!((out.z - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_low_pass_steady_input() {
        let value = Vector3::new(12.5f32, -3.0, 40.0);
        assert!((value.low_pass(&value, 0.97) - value).norm() < 1e-5);
    }
}
