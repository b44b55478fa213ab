use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{RideSearch, SearchCriteria};
use crate::models::{
    CreateRideRequest, CreateRideResponse, ErrorResponse, HealthResponse, RideSummary,
    SearchRidesRequest, SearchRidesResponse,
};
use crate::services::{
    AuthenticatedUser, CacheKey, CacheManager, GeocodedAddress, GeocoderClient, GeocoderError,
    PostgresClient,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<GeocoderClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub search: RideSearch,
}

/// Configure ride-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/rides", web::post().to(create_ride))
        .route("/rides/search", web::post().to(search_rides));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Resolve an address, consulting the geocode cache first.
///
/// Cache failures degrade to a provider call; they never fail the
/// request.
async fn resolve_address(
    state: &AppState,
    address: &str,
) -> Result<GeocodedAddress, GeocoderError> {
    let cache_key = CacheKey::geocode(address);

    match state.cache.get::<GeocodedAddress>(&cache_key).await {
        Ok(Some(hit)) => return Ok(hit),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache lookup failed for '{}': {}", address, e),
    }

    let resolved = state.geocoder.geocode(address).await?;

    if let Err(e) = state.cache.set(&cache_key, &resolved).await {
        tracing::warn!("Failed to cache geocode result for '{}': {}", address, e);
    }

    Ok(resolved)
}

/// Create a passenger ride request
///
/// POST /api/v1/rides
///
/// Request body:
/// ```json
/// {
///   "origin": "string",
///   "destination": "string",
///   "departureTime": "2024-06-01T08:00:00Z",
///   "seatsNeeded": 2
/// }
/// ```
///
/// Both endpoints are geocoded before anything is stored; if either
/// address cannot be resolved the request is rejected and no record is
/// persisted.
async fn create_ride(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateRideRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for create_ride request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let origin = match resolve_address(&state, &req.origin).await {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!("Failed to geocode origin '{}': {}", req.origin, e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Geocoding failed".to_string(),
                message: format!("Unable to resolve origin address: {}", e),
                status_code: 400,
            });
        }
    };

    let destination = match resolve_address(&state, &req.destination).await {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!("Failed to geocode destination '{}': {}", req.destination, e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Geocoding failed".to_string(),
                message: format!("Unable to resolve destination address: {}", e),
                status_code: 400,
            });
        }
    };

    let origin_location = match state
        .postgres
        .get_or_create_location(&origin.name, origin.point(), &origin.address_detail)
        .await
    {
        Ok(location) => location,
        Err(e) => {
            tracing::error!("Failed to store origin location: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to store location".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let destination_location = match state
        .postgres
        .get_or_create_location(
            &destination.name,
            destination.point(),
            &destination.address_detail,
        )
        .await
    {
        Ok(location) => location,
        Err(e) => {
            tracing::error!("Failed to store destination location: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to store location".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    match state
        .postgres
        .create_passenger_request(
            user.user_id,
            origin_location.id,
            destination_location.id,
            req.departure_time,
            req.seats_needed,
        )
        .await
    {
        Ok(ride_id) => {
            tracing::info!(
                "Created ride request {} for user {} ({} -> {})",
                ride_id,
                user.user_id,
                origin_location.name,
                destination_location.name
            );
            HttpResponse::Ok().json(CreateRideResponse { ride_id })
        }
        Err(e) => {
            tracing::error!("Failed to create ride request: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to create ride request".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Search stored ride requests
///
/// POST /api/v1/rides/search
///
/// Request body (all fields optional):
/// ```json
/// {
///   "origin": "string",
///   "destination": "string",
///   "departureTime": "2024-06-01T08:00:00Z",
///   "originLat": 39.99,
///   "originLon": 116.32,
///   "destinationLat": 39.87,
///   "destinationLon": 116.38
/// }
/// ```
async fn search_rides(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    req: web::Json<SearchRidesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search_rides request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let criteria = match SearchCriteria::from_request(&req) {
        Ok(criteria) => criteria,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation failed".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    let candidates = match state.postgres.list_requests().await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to fetch ride requests: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch ride requests".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let outcome = state.search.filter(&criteria, candidates);

    let requests: Vec<RideSummary> = outcome.requests.iter().map(RideSummary::from).collect();

    tracing::info!(
        "Search returned {} of {} ride requests",
        requests.len(),
        outcome.total_candidates
    );

    HttpResponse::Ok().json(SearchRidesResponse {
        requests,
        total_candidates: outcome.total_candidates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
