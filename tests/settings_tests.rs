//! Loading settings from host configuration files
#![cfg(feature = "serde")]

use park_compass::{EstimatorSettings, FinderSettings, GeoCoordinate, ProjectorSettings};

#[test]
fn test_partial_config_uses_defaults() {
    let settings: FinderSettings = serde_json::from_str(r#"{ "max_fix_accuracy_meters": 15.0 }"#).unwrap();

    assert_eq!(settings.max_fix_accuracy_meters, 15.0);
    assert_eq!(settings.projector, ProjectorSettings::default());
}

#[test]
fn test_nested_projector_settings() {
    let settings: FinderSettings =
        serde_json::from_str(r#"{ "projector": { "marker_distance_meters": 3.5 } }"#).unwrap();

    assert_eq!(settings.max_fix_accuracy_meters, 30.0);
    assert_eq!(settings.projector.marker_distance_meters, 3.5);
}

#[test]
fn test_estimator_settings() {
    let settings: EstimatorSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, EstimatorSettings::default());

    let settings: EstimatorSettings = serde_json::from_str(r#"{ "smoothing_factor": 0.9 }"#).unwrap();
    assert_eq!(settings.smoothing_factor, 0.9);
}

#[test]
fn test_coordinate_serialization() {
    let spot = GeoCoordinate::new(51.1279, 1.3136).unwrap();
    let json = serde_json::to_string(&spot).unwrap();

    assert_eq!(json, r#"{"latitude":51.1279,"longitude":1.3136}"#);
}

#[test]
fn test_out_of_range_coordinate_rejected() {
    let result = serde_json::from_str::<GeoCoordinate>(r#"{"latitude":95.0,"longitude":1.0}"#);
    assert!(result.is_err());
}
