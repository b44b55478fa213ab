use crate::models::GeoPoint;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `a` - First point in decimal degrees
/// * `b` - Second point in decimal degrees
///
/// # Returns
/// Great-circle distance in kilometers
#[inline]
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Check whether `point` lies within `radius_km` of `reference` (inclusive)
#[inline]
pub fn within_radius(reference: &GeoPoint, point: &GeoPoint, radius_km: f64) -> bool {
    haversine_distance(reference, point) <= radius_km
}

/// Retain the items whose associated point lies within `radius_km` of
/// `reference`, preserving input order.
///
/// Pure single pass, one distance evaluation per element.
pub fn filter_within_radius<T, F>(
    items: Vec<T>,
    reference: &GeoPoint,
    radius_km: f64,
    point_of: F,
) -> Vec<T>
where
    F: Fn(&T) -> GeoPoint,
{
    items
        .into_iter()
        .filter(|item| within_radius(reference, &point_of(item), radius_km))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london = GeoPoint::new(51.5074, -0.1278);
        let paris = GeoPoint::new(48.8566, 2.3522);

        let distance = haversine_distance(&london, &paris);
        assert!(
            (distance - 344.0).abs() < 10.0,
            "Distance should be ~344km, got {}",
            distance
        );
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = GeoPoint::new(39.9042, 116.4074);
        let b = GeoPoint::new(31.2304, 121.4737);

        let forward = haversine_distance(&a, &b);
        let backward = haversine_distance(&b, &a);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_identical_points_is_zero() {
        let point = GeoPoint::new(40.7128, -74.0060);
        assert_eq!(haversine_distance(&point, &point), 0.0);
    }

    #[test]
    fn test_filter_within_radius_never_exceeds_threshold() {
        let reference = GeoPoint::new(40.7128, -74.0060);
        let points = vec![
            GeoPoint::new(40.7128, -74.0060), // 0 km
            GeoPoint::new(40.7580, -73.9855), // ~5 km
            GeoPoint::new(40.6782, -73.9442), // ~6 km
            GeoPoint::new(41.5, -74.0),       // ~87 km
            GeoPoint::new(34.0522, -118.2437), // Los Angeles
        ];

        let radius_km = 10.0;
        let kept = filter_within_radius(points, &reference, radius_km, |p| *p);

        assert_eq!(kept.len(), 3);
        for point in &kept {
            assert!(haversine_distance(&reference, point) <= radius_km);
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let reference = GeoPoint::new(0.0, 0.0);
        let points = vec![
            (1, GeoPoint::new(0.01, 0.0)),
            (2, GeoPoint::new(10.0, 10.0)),
            (3, GeoPoint::new(0.0, 0.02)),
            (4, GeoPoint::new(0.02, 0.01)),
        ];

        let kept = filter_within_radius(points, &reference, 5.0, |(_, p)| *p);
        let ids: Vec<i32> = kept.iter().map(|(id, _)| *id).collect();

        assert_eq!(ids, vec![1, 3, 4]);
    }
}
