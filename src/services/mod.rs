// Service exports
pub mod auth;
pub mod cache;
pub mod geocoder;
pub mod postgres;

pub use auth::{AuthError, AuthService, AuthenticatedUser, Claims};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use geocoder::{GeocodedAddress, GeocoderClient, GeocoderError};
pub use postgres::{NewUser, PostgresClient, PostgresError};
