// Unit tests for the HitchRide backend

use hitchride_backend::core::{
    distance::{filter_within_radius, haversine_distance, within_radius},
    search::within_departure_window,
};
use hitchride_backend::models::{CreateRideRequest, GeoPoint, RegisterRequest};

use chrono::{Duration, TimeZone, Utc};
use validator::Validate;

#[test]
fn test_haversine_distance_zero() {
    let point = GeoPoint::new(40.7128, -74.0060);
    let distance = haversine_distance(&point, &point);
    assert!(distance < 0.01);
}

#[test]
fn test_haversine_distance_symmetry() {
    let a = GeoPoint::new(39.9832, 116.3164);
    let b = GeoPoint::new(31.2304, 121.4737);

    let forward = haversine_distance(&a, &b);
    let backward = haversine_distance(&b, &a);

    assert!((forward - backward).abs() < 1e-9);
}

#[test]
fn test_haversine_beijing_to_shanghai() {
    // Beijing to Shanghai is approximately 1067 km great-circle
    let beijing = GeoPoint::new(39.9042, 116.4074);
    let shanghai = GeoPoint::new(31.2304, 121.4737);

    let distance = haversine_distance(&beijing, &shanghai);
    assert!(
        (distance - 1067.0).abs() < 5.0,
        "Distance should be ~1067km, got {}",
        distance
    );
}

#[test]
fn test_haversine_short_urban_hop() {
    // Zhongguancun to Peking University, well under 5 km
    let a = GeoPoint::new(39.9832, 116.3164);
    let b = GeoPoint::new(39.9990, 116.3059);

    let distance = haversine_distance(&a, &b);
    assert!(distance > 0.0 && distance < 5.0, "Expected ~2km, got {}", distance);
}

#[test]
fn test_within_radius_boundary() {
    let reference = GeoPoint::new(0.0, 0.0);
    let point = GeoPoint::new(0.0, 0.05);

    let distance = haversine_distance(&reference, &point);
    assert!(within_radius(&reference, &point, distance));
    assert!(!within_radius(&reference, &point, distance - 0.001));
}

#[test]
fn test_filter_within_radius_property() {
    let reference = GeoPoint::new(39.9042, 116.4074);
    let points: Vec<GeoPoint> = (0..50)
        .map(|i| GeoPoint::new(39.9042 + (i as f64) * 0.01, 116.4074 + (i as f64) * 0.005))
        .collect();

    let radius_km = 10.0;
    let kept = filter_within_radius(points, &reference, radius_km, |p| *p);

    assert!(!kept.is_empty());
    for point in &kept {
        assert!(
            haversine_distance(&reference, point) <= radius_km,
            "Filter returned a point outside the radius"
        );
    }
}

#[test]
fn test_departure_window_inclusive_edges() {
    let requested = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();

    // Exactly on the window edge is still a match
    assert!(within_departure_window(
        requested + Duration::minutes(5),
        requested,
        5
    ));
    assert!(within_departure_window(
        requested - Duration::minutes(5),
        requested,
        5
    ));

    // One second past the edge is not
    assert!(!within_departure_window(
        requested + Duration::minutes(5) + Duration::seconds(1),
        requested,
        5
    ));
    assert!(!within_departure_window(
        requested - Duration::minutes(5) - Duration::seconds(1),
        requested,
        5
    ));
}

#[test]
fn test_departure_window_same_instant() {
    let requested = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    assert!(within_departure_window(requested, requested, 5));
}

fn ride_request_with_seats(seats_needed: i32) -> CreateRideRequest {
    CreateRideRequest {
        origin: "Zhongguancun".to_string(),
        destination: "Beijing South Station".to_string(),
        departure_time: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
        seats_needed,
    }
}

#[test]
fn test_non_positive_seat_count_rejected() {
    assert!(ride_request_with_seats(0).validate().is_err());
    assert!(ride_request_with_seats(-3).validate().is_err());
    assert!(ride_request_with_seats(1).validate().is_ok());
}

#[test]
fn test_short_password_rejected() {
    let request = RegisterRequest {
        username: "rider".to_string(),
        phone: "13800000000".to_string(),
        password: "short".to_string(),
        email: None,
        user_type: None,
    };

    assert!(request.validate().is_err());

    let request = RegisterRequest {
        password: "long enough".to_string(),
        ..request
    };
    assert!(request.validate().is_ok());
}
