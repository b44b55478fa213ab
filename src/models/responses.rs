use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::PassengerRequest;

/// Response carrying a freshly issued access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Response for ride creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRideResponse {
    #[serde(rename = "rideId")]
    pub ride_id: i64,
}

/// Passenger identity attached to a search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerInfo {
    pub username: String,
    pub phone: String,
}

/// One ride request as returned by the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideSummary {
    #[serde(rename = "rideId")]
    pub ride_id: i64,
    pub origin: String,
    pub destination: String,
    #[serde(rename = "departureTime")]
    pub departure_time: DateTime<Utc>,
    #[serde(rename = "seatsNeeded")]
    pub seats_needed: i32,
    pub passenger: PassengerInfo,
}

impl From<&PassengerRequest> for RideSummary {
    fn from(request: &PassengerRequest) -> Self {
        Self {
            ride_id: request.id,
            origin: request.origin.label().to_string(),
            destination: request.destination.label().to_string(),
            departure_time: request.departure_time,
            seats_needed: request.seats_needed,
            passenger: PassengerInfo {
                username: request.passenger_username.clone(),
                phone: request.passenger_phone.clone(),
            },
        }
    }
}

/// Response for the ride search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRidesResponse {
    pub requests: Vec<RideSummary>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
