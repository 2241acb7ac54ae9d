use park_compass::{DirectionalProjector, GeoCoordinate, HeadingFilter, OrientationSample};

fn main() {
    let mut filter = HeadingFilter::new();
    let projector = DirectionalProjector::new();

    let user = GeoCoordinate::new(51.1279, 1.3136).expect("valid coordinate");
    let car = GeoCoordinate::new(51.1289, 1.3146).expect("valid coordinate");

    for _ in 0..10 {
        // this loop should repeat each time new sensor data is available
        let accelerometer = OrientationSample::accelerometer(0.0, 0.0, 9.81); // replace with actual accelerometer data in m/s²
        let magnetometer = OrientationSample::magnetometer(0.0, 20.0, -40.0); // replace with actual magnetometer data in µT

        filter.update(&accelerometer);
        filter.update(&magnetometer);

        let direction = projector.direction(filter.azimuth(), &user, &car);

        println!(
            "Azimuth: {:.2}, Bearing: {:.2}, Arrow: {:.2}, Marker: ({:.2}, {:.2}, {:.2})",
            filter.azimuth(),
            direction.bearing_degrees,
            direction.relative_angle_degrees,
            direction.projected_offset.x,
            direction.projected_offset.y,
            direction.projected_offset.z
        );
    }
}
