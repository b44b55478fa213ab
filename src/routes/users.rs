use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{AuthResponse, ErrorResponse, LoginRequest, RegisterRequest, UserRole};
use crate::routes::rides::AppState;
use crate::services::{AuthService, NewUser, PostgresError};

/// Configure account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/register", web::post().to(register))
        .route("/users/login", web::post().to(login));
}

/// Register a new account
///
/// POST /api/v1/users/register
///
/// Request body:
/// ```json
/// {
///   "username": "string",
///   "phone": "string",
///   "password": "string",
///   "userType": "passenger|driver"
/// }
/// ```
async fn register(
    state: web::Data<AppState>,
    auth: web::Data<AuthService>,
    req: web::Json<RegisterRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for register request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let role = match req.user_type.as_deref() {
        None | Some("passenger") => UserRole::Passenger,
        Some("driver") => UserRole::Driver,
        Some(_) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid user type".to_string(),
                message: "User type must be one of: passenger, driver".to_string(),
                status_code: 400,
            });
        }
    };

    let password_hash = match auth.hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let user = match state
        .postgres
        .create_user(NewUser {
            username: req.username.clone(),
            phone: req.phone.clone(),
            email: req.email.clone(),
            password_hash,
            role,
        })
        .await
    {
        Ok(user) => user,
        Err(PostgresError::Conflict(message)) => {
            tracing::info!("Registration conflict for phone {}: {}", req.phone, message);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message,
                status_code: 400,
            });
        }
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::info!("Registered user {} ({:?})", user.id, user.role);

    match auth.issue_token(user.id) {
        Ok(token) => HttpResponse::Ok().json(AuthResponse { token }),
        Err(e) => {
            tracing::error!("Failed to issue token for user {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Log in with phone and password
///
/// POST /api/v1/users/login
///
/// An unknown phone number and a wrong password stay distinguishable:
/// 404 for the former, 401 for the latter.
async fn login(
    state: web::Data<AppState>,
    auth: web::Data<AuthService>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user = match state.postgres.get_user_by_phone(&req.phone).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "User not found".to_string(),
                message: "No account registered for this phone number".to_string(),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to look up user by phone: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Login failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if user.banned() {
        tracing::info!("Rejected login for banned user {}", user.id);
        return HttpResponse::Forbidden().json(ErrorResponse {
            error: "Account banned".to_string(),
            message: "This account has been banned".to_string(),
            status_code: 403,
        });
    }

    match auth.verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!("Wrong password for user {}", user.id);
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Invalid password".to_string(),
                message: "The password does not match this account".to_string(),
                status_code: 401,
            });
        }
        Err(e) => {
            tracing::error!("Password verification failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Login failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    }

    match auth.issue_token(user.id) {
        Ok(token) => HttpResponse::Ok().json(AuthResponse { token }),
        Err(e) => {
            tracing::error!("Failed to issue token for user {}: {}", user.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Login failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
