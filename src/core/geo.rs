use std::f64::consts::PI;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Great-circle distance in kilometers between two lat/lng points given in degrees.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = to_radians(lat1);
    let lat2 = to_radians(lat2);
    let dlat = lat2 - lat1;
    let dlon = to_radians(lon2) - to_radians(lon1);

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` a hair past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: [(f64, f64); 6] = [
        (39.78, -89.65),
        (39.67, -89.70),
        (37.21, -93.30),
        (43.15, -77.60),
        (-33.87, 151.21),
        (0.0, 0.0),
    ];

    #[test]
    fn test_to_radians() {
        assert_eq!(to_radians(0.0), 0.0);
        assert!((to_radians(180.0) - PI).abs() < 1e-12);
        assert!((to_radians(-90.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_point_is_zero() {
        for (lat, lng) in POINTS {
            assert!(haversine(lat, lng, lat, lng).abs() < 1e-9);
        }
    }

    #[test]
    fn test_symmetry() {
        for (lat1, lng1) in POINTS {
            for (lat2, lng2) in POINTS {
                let forward = haversine(lat1, lng1, lat2, lng2);
                let backward = haversine(lat2, lng2, lat1, lng1);
                assert!((forward - backward).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_additive_along_meridian() {
        // 10N and 20N both lie on the arc between the equator and 30N
        let ac = haversine(0.0, 10.0, 30.0, 10.0);
        let ab = haversine(0.0, 10.0, 20.0, 10.0);
        let bc = haversine(20.0, 10.0, 30.0, 10.0);
        assert!((ac - (ab + bc)).abs() < 1e-6);
    }

    #[test]
    fn test_additive_along_equator() {
        let ac = haversine(0.0, -40.0, 0.0, 50.0);
        let ab = haversine(0.0, -40.0, 0.0, 5.0);
        let bc = haversine(0.0, 5.0, 0.0, 50.0);
        assert!((ac - (ab + bc)).abs() < 1e-6);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = haversine(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - PI * EARTH_RADIUS_KM).abs() < 1e-6);

        let poles = haversine(90.0, 0.0, -90.0, 0.0);
        assert!((poles - PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_known_distance() {
        // Springfield IL -> Chatham IL, roughly 13 km
        let d = haversine(39.78, -89.65, 39.67, -89.70);
        assert!(d > 11.0 && d < 14.0, "Expected ~13km, got {d}");
    }
}
