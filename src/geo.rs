use serde::{Deserialize, Serialize};

/// Mean Earth radius used for every distance in the crate.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Great-circle distance in kilometres. NaN if either point has a NaN
/// component.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    // Rounding can push h just past 1 for antipodal points.
    let h = ((delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = Coordinate::new(56.9443, 24.1150);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn short_city_distance() {
        let central = Coordinate::new(56.947, 24.113);
        let university = Coordinate::new(56.950, 24.105);
        let d = central.distance_km(&university);
        assert!(d > 0.0 && d < 1.0, "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        // 2 * pi * 6371 / 360
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = haversine_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn nan_coordinate_propagates() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!(haversine_km(Coordinate::new(f64::NAN, f64::NAN), origin).is_nan());
        assert!(haversine_km(origin, Coordinate::new(10.0, f64::NAN)).is_nan());
    }
}
