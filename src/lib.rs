//! HitchRide - Carpool matching backend
//!
//! This library implements the HitchRide carpool API: account
//! registration and login, driver and vehicle records, geocoded ride
//! requests, and the spatial/temporal search that pairs passengers with
//! compatible requests.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    distance::{filter_within_radius, haversine_distance},
    RideSearch, SearchCriteria, SearchPolicy,
};
pub use crate::models::{GeoPoint, Location, PassengerRequest, SearchRidesRequest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let beijing = GeoPoint::new(39.9042, 116.4074);
        let shanghai = GeoPoint::new(31.2304, 121.4737);
        assert!(haversine_distance(&beijing, &shanghai) > 1000.0);
    }
}
