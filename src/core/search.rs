use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::core::distance::within_radius;
use crate::models::{GeoPoint, Location, PassengerRequest, SearchRidesRequest};

/// Distance and time thresholds applied by the ride search.
///
/// The asymmetric radii reflect how people search: origins are loose
/// ("anywhere near my side of town"), destinations tight (the last leg
/// is walked).
#[derive(Debug, Clone, Copy)]
pub struct SearchPolicy {
    pub origin_radius_km: f64,
    pub destination_radius_km: f64,
    pub departure_window_minutes: i64,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            origin_radius_km: 10.0,
            destination_radius_km: 1.0,
            departure_window_minutes: 5,
        }
    }
}

/// Parsed search filter; absent fields impose no constraint
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub origin_text: Option<String>,
    pub destination_text: Option<String>,
    pub origin_point: Option<GeoPoint>,
    pub destination_point: Option<GeoPoint>,
    pub departure_time: Option<DateTime<Utc>>,
}

/// Errors building criteria from a request
#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("{field}Lat and {field}Lon must be provided together")]
    UnpairedCoordinates { field: &'static str },
}

impl SearchCriteria {
    /// Build criteria from a validated search request.
    ///
    /// Latitude/longitude fields must arrive in pairs; a lone half of a
    /// pair is rejected rather than silently ignored.
    pub fn from_request(request: &SearchRidesRequest) -> Result<Self, CriteriaError> {
        Ok(Self {
            origin_text: request.origin.clone().filter(|text| !text.is_empty()),
            destination_text: request.destination.clone().filter(|text| !text.is_empty()),
            origin_point: point_pair(request.origin_lat, request.origin_lon, "origin")?,
            destination_point: point_pair(
                request.destination_lat,
                request.destination_lon,
                "destination",
            )?,
            departure_time: request.departure_time,
        })
    }
}

fn point_pair(
    lat: Option<f64>,
    lon: Option<f64>,
    field: &'static str,
) -> Result<Option<GeoPoint>, CriteriaError> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some(GeoPoint::new(lat, lon))),
        (None, None) => Ok(None),
        _ => Err(CriteriaError::UnpairedCoordinates { field }),
    }
}

/// Case-insensitive substring match against a location's name or its
/// formatted address detail.
#[inline]
pub fn matches_location_text(location: &Location, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    if location.name.to_lowercase().contains(&needle) {
        return true;
    }
    location
        .address_detail
        .as_deref()
        .map(|detail| detail.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

/// Check whether a departure falls inside the window around the requested
/// time, boundaries inclusive.
#[inline]
pub fn within_departure_window(
    departure: DateTime<Utc>,
    requested: DateTime<Utc>,
    window_minutes: i64,
) -> bool {
    let window = Duration::minutes(window_minutes);
    departure >= requested - window && departure <= requested + window
}

/// Result of a ride search
#[derive(Debug)]
pub struct SearchOutcome {
    pub requests: Vec<PassengerRequest>,
    pub total_candidates: usize,
}

/// Conjunctive filter over stored passenger requests.
///
/// Applies, in order: text substring match on both endpoints, coordinate
/// radius checks, and the departure-time window. Every present criteria
/// field must match; absent fields skip their predicate entirely.
#[derive(Debug, Clone)]
pub struct RideSearch {
    policy: SearchPolicy,
}

impl RideSearch {
    pub fn new(policy: SearchPolicy) -> Self {
        Self { policy }
    }

    pub fn with_default_policy() -> Self {
        Self {
            policy: SearchPolicy::default(),
        }
    }

    /// Filter candidates down to those satisfying every present predicate.
    ///
    /// Single pass, order preserved. Empty criteria return the full
    /// candidate set unchanged.
    pub fn filter(
        &self,
        criteria: &SearchCriteria,
        candidates: Vec<PassengerRequest>,
    ) -> SearchOutcome {
        let total_candidates = candidates.len();

        let requests: Vec<PassengerRequest> = candidates
            .into_iter()
            .filter(|request| self.matches(criteria, request))
            .collect();

        SearchOutcome {
            requests,
            total_candidates,
        }
    }

    fn matches(&self, criteria: &SearchCriteria, request: &PassengerRequest) -> bool {
        if let Some(text) = &criteria.origin_text {
            if !matches_location_text(&request.origin, text) {
                return false;
            }
        }

        if let Some(text) = &criteria.destination_text {
            if !matches_location_text(&request.destination, text) {
                return false;
            }
        }

        if let Some(point) = &criteria.origin_point {
            if !within_radius(point, &request.origin.point(), self.policy.origin_radius_km) {
                return false;
            }
        }

        if let Some(point) = &criteria.destination_point {
            if !within_radius(
                point,
                &request.destination.point(),
                self.policy.destination_radius_km,
            ) {
                return false;
            }
        }

        if let Some(requested) = criteria.departure_time {
            if !within_departure_window(
                request.departure_time,
                requested,
                self.policy.departure_window_minutes,
            ) {
                return false;
            }
        }

        true
    }
}

impl Default for RideSearch {
    fn default() -> Self {
        Self::with_default_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn location(id: i64, name: &str, lat: f64, lon: f64, detail: &str) -> Location {
        Location {
            id,
            name: name.to_string(),
            latitude: lat,
            longitude: lon,
            address_detail: Some(detail.to_string()),
        }
    }

    fn request(id: i64, origin: Location, destination: Location, departure: DateTime<Utc>) -> PassengerRequest {
        PassengerRequest {
            id,
            passenger_id: 1,
            passenger_username: "rider".to_string(),
            passenger_phone: "13800000000".to_string(),
            origin,
            destination,
            departure_time: departure,
            seats_needed: 2,
            created_at: None,
        }
    }

    fn departure() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn sample_requests() -> Vec<PassengerRequest> {
        vec![
            request(
                1,
                location(1, "Zhongguancun", 39.9832, 116.3164, "Haidian District, Beijing"),
                location(2, "Beijing South Station", 39.8653, 116.3785, "Fengtai District, Beijing"),
                departure(),
            ),
            request(
                2,
                location(3, "Wangjing", 39.9937, 116.4748, "Chaoyang District, Beijing"),
                location(2, "Beijing South Station", 39.8653, 116.3785, "Fengtai District, Beijing"),
                departure() + Duration::minutes(30),
            ),
            request(
                3,
                location(4, "People's Square", 31.2336, 121.4692, "Huangpu District, Shanghai"),
                location(5, "Hongqiao Airport", 31.1979, 121.3363, "Changning District, Shanghai"),
                departure(),
            ),
        ]
    }

    #[test]
    fn test_empty_criteria_returns_everything_in_order() {
        let search = RideSearch::with_default_policy();
        let outcome = search.filter(&SearchCriteria::default(), sample_requests());

        assert_eq!(outcome.total_candidates, 3);
        let ids: Vec<i64> = outcome.requests.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_origin_text_matches_name_case_insensitive() {
        let search = RideSearch::with_default_policy();
        let criteria = SearchCriteria {
            origin_text: Some("zhongguancun".to_string()),
            ..Default::default()
        };

        let outcome = search.filter(&criteria, sample_requests());
        assert_eq!(outcome.requests.len(), 1);
        assert_eq!(outcome.requests[0].id, 1);
    }

    #[test]
    fn test_origin_text_matches_address_detail() {
        let search = RideSearch::with_default_policy();
        let criteria = SearchCriteria {
            origin_text: Some("chaoyang".to_string()),
            ..Default::default()
        };

        let outcome = search.filter(&criteria, sample_requests());
        assert_eq!(outcome.requests.len(), 1);
        assert_eq!(outcome.requests[0].id, 2);
    }

    #[test]
    fn test_origin_point_uses_wide_radius() {
        let search = RideSearch::with_default_policy();
        // Near Zhongguancun; Wangjing is ~14 km away, Shanghai far away
        let criteria = SearchCriteria {
            origin_point: Some(GeoPoint::new(39.9900, 116.3200)),
            ..Default::default()
        };

        let outcome = search.filter(&criteria, sample_requests());
        assert_eq!(outcome.requests.len(), 1);
        assert_eq!(outcome.requests[0].id, 1);
    }

    #[test]
    fn test_destination_point_uses_tight_radius() {
        let search = RideSearch::with_default_policy();
        // ~0.5 km from Beijing South Station
        let criteria = SearchCriteria {
            destination_point: Some(GeoPoint::new(39.8690, 116.3810)),
            ..Default::default()
        };

        let outcome = search.filter(&criteria, sample_requests());
        let ids: Vec<i64> = outcome.requests.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);

        // ~3 km away misses the 1 km destination radius
        let criteria = SearchCriteria {
            destination_point: Some(GeoPoint::new(39.8900, 116.3900)),
            ..Default::default()
        };
        let outcome = search.filter(&criteria, sample_requests());
        assert!(outcome.requests.is_empty());
    }

    #[test]
    fn test_departure_window_boundary_inclusive() {
        let requested = departure();

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
        assert!(!within_departure_window(
            requested + Duration::minutes(5) + Duration::seconds(1),
            requested,
            5
        ));
    }

    #[test]
    fn test_departure_filter_excludes_outside_window() {
        let search = RideSearch::with_default_policy();
        let criteria = SearchCriteria {
            departure_time: Some(departure()),
            ..Default::default()
        };

        let outcome = search.filter(&criteria, sample_requests());
        let ids: Vec<i64> = outcome.requests.iter().map(|r| r.id).collect();
        // Request 2 departs 30 minutes later and falls outside the window
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_predicates_are_and_combined() {
        let search = RideSearch::with_default_policy();
        let criteria = SearchCriteria {
            origin_text: Some("beijing".to_string()),
            departure_time: Some(departure()),
            ..Default::default()
        };

        let outcome = search.filter(&criteria, sample_requests());
        // Request 2 matches the text but not the window; request 3 the
        // window but not the text
        assert_eq!(outcome.requests.len(), 1);
        assert_eq!(outcome.requests[0].id, 1);
    }

    #[test]
    fn test_unpaired_coordinates_rejected() {
        let request = SearchRidesRequest {
            origin_lat: Some(39.99),
            ..Default::default()
        };

        let err = SearchCriteria::from_request(&request).unwrap_err();
        assert!(err.to_string().contains("originLat"));
    }

    #[test]
    fn test_criteria_from_full_request() {
        let request = SearchRidesRequest {
            origin: Some("Zhongguancun".to_string()),
            destination: Some("South Station".to_string()),
            departure_time: Some(departure()),
            origin_lat: Some(39.99),
            origin_lon: Some(116.32),
            destination_lat: Some(39.87),
            destination_lon: Some(116.38),
        };

        let criteria = SearchCriteria::from_request(&request).unwrap();
        assert!(criteria.origin_point.is_some());
        assert!(criteria.destination_point.is_some());
        assert_eq!(criteria.origin_text.as_deref(), Some("Zhongguancun"));
    }
}
