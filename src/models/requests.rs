use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 15))]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "user_type", rename = "userType")]
    pub user_type: Option<String>,
}

/// Request to log in with phone and password
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 15))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request to create a driver record for the calling user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterDriverRequest {
    #[validate(length(min = 1, max = 50))]
    #[serde(alias = "license_number", rename = "licenseNumber")]
    pub license_number: String,
}

/// Request to register a vehicle under the caller's driver record
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterVehicleRequest {
    #[validate(length(min = 1, max = 20))]
    #[serde(alias = "plate_number", rename = "plateNumber")]
    pub plate_number: String,
    #[validate(length(min = 1, max = 50))]
    pub brand: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(length(min = 1, max = 20))]
    pub color: String,
    #[validate(range(min = 1))]
    pub seats: i32,
}

/// Request to create a passenger ride request
///
/// Origin and destination are free-text addresses; both must geocode
/// successfully before anything is stored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRideRequest {
    #[validate(length(min = 1))]
    pub origin: String,
    #[validate(length(min = 1))]
    pub destination: String,
    #[serde(alias = "departure_time", rename = "departureTime")]
    pub departure_time: DateTime<Utc>,
    #[validate(range(min = 1))]
    #[serde(alias = "seats_needed", rename = "seatsNeeded")]
    pub seats_needed: i32,
}

/// Search filter over stored ride requests, all fields optional.
///
/// Coordinates come in lat/lon pairs; supplying only half a pair is a
/// validation error rather than a silently skipped predicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchRidesRequest {
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default, alias = "departure_time", rename = "departureTime")]
    pub departure_time: Option<DateTime<Utc>>,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default, alias = "origin_lat", rename = "originLat")]
    pub origin_lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default, alias = "origin_lon", rename = "originLon")]
    pub origin_lon: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default, alias = "destination_lat", rename = "destinationLat")]
    pub destination_lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default, alias = "destination_lon", rename = "destinationLon")]
    pub destination_lon: Option<f64>,
}
