use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest, HttpResponse};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Errors that can occur issuing or checking credentials
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),
}

/// JWT claims carried by access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued to
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates access tokens, and hashes passwords
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_secs,
        }
    }

    pub fn hash_password(&self, raw: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(raw, bcrypt::DEFAULT_COST)?)
    }

    pub fn verify_password(&self, raw: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(bcrypt::verify(raw, hash)?)
    }

    /// Issue an HS256 access token for a user
    pub fn issue_token(&self, user_id: i64) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + self.token_ttl_secs,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Validate a token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

/// Authenticated caller, extracted from the Authorization header.
///
/// Handlers taking this parameter reject requests without a valid
/// bearer token with a 401 before the handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let auth = req
        .app_data::<web::Data<AuthService>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("auth service not configured"))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("Missing bearer token"))?;

    let claims = auth.verify_token(token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
    })
}

fn unauthorized(message: &str) -> actix_web::Error {
    let body = ErrorResponse {
        error: "Unauthorized".to_string(),
        message: message.to_string(),
        status_code: 401,
    };

    actix_web::error::InternalError::from_response(
        message.to_string(),
        HttpResponse::Unauthorized().json(body),
    )
    .into()
}
