//! Great-circle distance between two (latitude, longitude) points.
//!
//! Spherical earth approximation is plenty for ranking restaurants by
//! delivery distance; the result is only compared, never displayed with
//! survey-grade precision.

/// Mean earth radius in kilometers (IUGG).
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Haversine distance in kilometers between `from` and `to`, both given as
/// (latitude, longitude) in degrees.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let moscow = (55.7558, 37.6173);
        assert_eq!(haversine_km(moscow, moscow), 0.0);
    }

    #[test]
    fn test_moscow_to_saint_petersburg() {
        let moscow = (55.7558, 37.6173);
        let spb = (59.9343, 30.3351);
        let d = haversine_km(moscow, spb);
        // Great-circle distance is about 634 km.
        assert!((d - 634.0).abs() < 5.0, "unexpected distance: {d}");
    }

    #[test]
    fn test_symmetry() {
        let a = (55.7558, 37.6173);
        let b = (54.6872, 25.2797);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_latitude() {
        // One degree of latitude is roughly 111 km anywhere on the globe.
        let d = haversine_km((50.0, 10.0), (51.0, 10.0));
        assert!((d - 111.2).abs() < 1.0, "unexpected distance: {d}");
    }
}
