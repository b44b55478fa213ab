use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ErrorResponse, RegisterDriverRequest, RegisterVehicleRequest};
use crate::routes::rides::AppState;
use crate::services::{AuthenticatedUser, PostgresError};

/// Configure driver and vehicle routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/drivers/register", web::post().to(register_driver))
        .route("/drivers/vehicles", web::post().to(register_vehicle));
}

/// Create a driver record for the calling user
///
/// POST /api/v1/drivers/register
///
/// The record starts in pending approval with the default rating.
async fn register_driver(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<RegisterDriverRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state
        .postgres
        .create_driver(user.user_id, &req.license_number)
        .await
    {
        Ok(driver) => {
            tracing::info!(
                "Registered driver {} for user {} (pending approval)",
                driver.id,
                user.user_id
            );
            HttpResponse::Ok().json(driver)
        }
        Err(PostgresError::Conflict(message)) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Driver registration failed".to_string(),
                message,
                status_code: 400,
            })
        }
        Err(e) => {
            tracing::error!("Failed to create driver record: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Driver registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Register a vehicle under the caller's driver record
///
/// POST /api/v1/drivers/vehicles
async fn register_vehicle(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<RegisterVehicleRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let driver = match state.postgres.get_driver_by_user(user.user_id).await {
        Ok(Some(driver)) => driver,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Driver record not found".to_string(),
                message: "Register as a driver before adding vehicles".to_string(),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to look up driver record: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Vehicle registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    match state
        .postgres
        .create_vehicle(
            driver.id,
            &req.plate_number,
            &req.brand,
            &req.model,
            &req.color,
            req.seats,
        )
        .await
    {
        Ok(vehicle) => {
            tracing::info!(
                "Registered vehicle {} ({}) for driver {}",
                vehicle.id,
                vehicle.plate_number,
                driver.id
            );
            HttpResponse::Ok().json(vehicle)
        }
        Err(PostgresError::Conflict(message)) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Vehicle registration failed".to_string(),
                message,
                status_code: 400,
            })
        }
        Err(e) => {
            tracing::error!("Failed to register vehicle: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Vehicle registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
