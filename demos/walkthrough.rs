//! Car finder walkthrough
//!
//! Simulates a full session: parking the car, walking away, then turning on
//! the spot while the compass arrow and AR marker track the car.
//!
//! Features demonstrated:
//! - Scoped sensor subscription with `HeadingEstimator::listen`
//! - Pushing azimuth updates into a `CarFinder` through a listener
//! - Accuracy gating of live location fixes
//! - Rendering through the compass and marker collaborator traits
//!
//! Run with: `RUST_LOG=debug cargo run --example walkthrough`

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use log::info;
use nalgebra::{Rotation3, Vector3};
use park_compass::{
    CarFinder, CompassRenderer, GeoCoordinate, HeadingEstimator, LocationFix, MarkerRenderer, MemoryStore,
    OrientationSample, SensorSource,
};

/// Stand-in for the platform sensor service
struct SimulatedSensors;

impl SensorSource for SimulatedSensors {
    fn subscribe(&mut self) -> park_compass::Result<()> {
        info!("accelerometer and magnetometer registered");
        Ok(())
    }

    fn unsubscribe(&mut self) {
        info!("accelerometer and magnetometer unregistered");
    }
}

/// Prints what a UI would draw
struct ConsoleScreen;

impl CompassRenderer for ConsoleScreen {
    fn rotate_arrow(&mut self, degrees: f32) {
        println!("  arrow rotated {:>7.1}°", degrees);
    }
}

impl MarkerRenderer for ConsoleScreen {
    fn place_marker(&mut self, offset: Vector3<f32>) {
        println!("  marker at ({:>5.2}, {:>5.2}, {:>5.2}) m", offset.x, offset.y, offset.z);
    }
}

/// Sensor readings for a phone held upright at `heading` degrees
fn readings(heading: f32) -> (OrientationSample, OrientationSample) {
    let attitude = Rotation3::from_axis_angle(&Vector3::z_axis(), -heading.to_radians())
        * Rotation3::from_axis_angle(&Vector3::x_axis(), 70f32.to_radians());
    let to_device = attitude.inverse();
    let gravity = to_device * Vector3::new(0.0, 0.0, 9.81);
    let field = to_device * Vector3::new(0.0, 19.0, -44.0);

    (
        OrientationSample::accelerometer(gravity.x, gravity.y, gravity.z),
        OrientationSample::magnetometer(field.x, field.y, field.z),
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let finder = Rc::new(RefCell::new(CarFinder::new(MemoryStore::new())?));

    // Park My Car
    let parking_spot = GeoCoordinate::new(51.1279, 1.3136)?;
    finder.borrow_mut().park_here(parking_spot)?;

    // Walk ~150 m south-west; one fix is too inaccurate and gets dropped
    let fixes = [
        LocationFix::new(GeoCoordinate::new(51.1270, 1.3125)?, 8.0),
        LocationFix::new(GeoCoordinate::new(51.1300, 1.3300)?, 65.0),
        LocationFix::new(GeoCoordinate::new(51.1268, 1.3120)?, 6.0),
    ];
    for fix in fixes {
        finder.borrow_mut().on_fix(fix);
    }

    let mut estimator = HeadingEstimator::new(SimulatedSensors);
    let sink = Rc::clone(&finder);
    estimator.subscribe(move |azimuth| {
        sink.borrow_mut().on_azimuth(azimuth);
    });

    let mut screen = ConsoleScreen;
    {
        let mut listening = estimator.listen()?;

        for heading in [0.0, 45.0, 90.0, 180.0, 270.0] {
            // About 4 s of samples at 50 Hz per heading
            for _ in 0..200 {
                let (gravity, field) = readings(heading);
                listening.on_sample(gravity);
                listening.on_sample(field);
            }

            let Some(direction) = finder.borrow().direction() else {
                continue;
            };

            println!(
                "facing {:>5.1}° (estimated {:>5.1}°): car at bearing {:.1}°, {:.0} m away",
                heading,
                listening.current_azimuth_degrees(),
                direction.bearing_degrees,
                direction.distance_meters
            );
            direction.render_compass(&mut screen);
            direction.render_marker(&mut screen);
        }
    }

    info!("session finished, sensors released: {}", !estimator.is_listening());
    Ok(())
}
