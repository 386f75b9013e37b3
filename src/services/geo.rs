//! Geographic calculations
//!
//! Planar approximation with fixed per-degree scale factors. Only valid inside
//! the one mid-latitude region the factors were calibrated for.

use crate::types::Coordinates;

/// Kilometers per degree of latitude
pub const LAT_KM_PER_DEGREE: f64 = 111.0;

/// Kilometers per degree of longitude at the target region's latitude
pub const LON_KM_PER_DEGREE: f64 = 85.0;

/// Approximate straight-line distance between two points in kilometers
pub fn planar_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat) * LAT_KM_PER_DEGREE;
    let d_lng = (to.lng - from.lng) * LON_KM_PER_DEGREE;

    (d_lat * d_lat + d_lng * d_lng).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_same_point_is_zero() {
        let point = Coordinates::new(-37.8, 145.0);
        assert_eq!(planar_distance(&point, &point), 0.0);
    }

    #[test]
    fn test_one_degree_latitude() {
        let a = Coordinates::new(-37.0, 145.0);
        let b = Coordinates::new(-38.0, 145.0);
        assert!((planar_distance(&a, &b) - 111.0).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_longitude() {
        let a = Coordinates::new(-37.0, 145.0);
        let b = Coordinates::new(-37.0, 146.0);
        assert!((planar_distance(&a, &b) - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_hundredth_degree_longitude() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 0.01);
        assert!((planar_distance(&a, &b) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_melbourne_depot_to_geelong() {
        // Campbellfield depot to Geelong, ~75 km on the planar model
        let depot = Coordinates::new(-37.6805, 145.0064);
        let geelong = Coordinates::new(-38.1499, 144.3617);

        let distance = planar_distance(&depot, &geelong);
        assert!((distance - 75.0).abs() < 10.0);
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(lat in -90.0f64..90.0, lng in -180.0f64..180.0) {
            let p = Coordinates::new(lat, lng);
            prop_assert_eq!(planar_distance(&p, &p), 0.0);
        }

        #[test]
        fn prop_distance_is_symmetric(
            lat1 in -90.0f64..90.0, lng1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0, lng2 in -180.0f64..180.0,
        ) {
            let a = Coordinates::new(lat1, lng1);
            let b = Coordinates::new(lat2, lng2);
            prop_assert_eq!(planar_distance(&a, &b), planar_distance(&b, &a));
        }

        #[test]
        fn prop_distinct_points_are_positive(
            lat in -89.0f64..89.0, lng in -179.0f64..179.0, dlat in 0.001f64..1.0,
        ) {
            let a = Coordinates::new(lat, lng);
            let b = Coordinates::new(lat + dlat, lng);
            prop_assert!(planar_distance(&a, &b) > 0.0);
        }
    }
}
