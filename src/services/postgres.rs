use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    ApprovalStatus, Driver, GeoPoint, Location, PassengerRequest, User, UserRole, UserStatus,
    Vehicle,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl PostgresError {
    /// Map a unique-constraint violation onto Conflict with a
    /// caller-facing message; pass every other error through.
    fn conflict_on_unique(err: sqlx::Error, message: &str) -> PostgresError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PostgresError::Conflict(message.to_string())
            }
            _ => PostgresError::SqlxError(err),
        }
    }
}

/// Payload for inserting a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
}

/// PostgreSQL client for accounts, locations and ride requests
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, PostgresError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Insert a new user; a duplicate phone number is a Conflict
    pub async fn create_user(&self, user: NewUser) -> Result<User, PostgresError> {
        let query = r#"
            INSERT INTO users (username, phone, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, phone, email, password_hash, role, status, registered_at
        "#;

        let row = sqlx::query(query)
            .bind(&user.username)
            .bind(&user.phone)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PostgresError::conflict_on_unique(e, "phone number already registered"))?;

        tracing::debug!("Created user {} ({})", user.username, user.phone);

        Ok(user_from_row(&row))
    }

    /// Look up a user by phone number
    pub async fn get_user_by_phone(&self, phone: &str) -> Result<Option<User>, PostgresError> {
        let query = r#"
            SELECT id, username, phone, email, password_hash, role, status, registered_at
            FROM users
            WHERE phone = $1
        "#;

        let row = sqlx::query(query)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Look up a user by id
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User, PostgresError> {
        let query = r#"
            SELECT id, username, phone, email, password_hash, role, status, registered_at
            FROM users
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("user {}", user_id)))?;

        Ok(user_from_row(&row))
    }

    /// Create a driver record for a user, pending approval
    pub async fn create_driver(
        &self,
        user_id: i64,
        license_number: &str,
    ) -> Result<Driver, PostgresError> {
        let query = r#"
            INSERT INTO drivers (user_id, license_number)
            VALUES ($1, $2)
            RETURNING id, user_id, license_number, approval_status, rating
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(license_number)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PostgresError::conflict_on_unique(e, "driver record already exists"))?;

        Ok(driver_from_row(&row))
    }

    /// Look up the driver record belonging to a user
    pub async fn get_driver_by_user(&self, user_id: i64) -> Result<Option<Driver>, PostgresError> {
        let query = r#"
            SELECT id, user_id, license_number, approval_status, rating
            FROM drivers
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(driver_from_row))
    }

    /// Register a vehicle under a driver record
    pub async fn create_vehicle(
        &self,
        driver_id: i64,
        plate_number: &str,
        brand: &str,
        model: &str,
        color: &str,
        seats: i32,
    ) -> Result<Vehicle, PostgresError> {
        let query = r#"
            INSERT INTO vehicles (driver_id, plate_number, brand, model, color, seats)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, driver_id, plate_number, brand, model, color, seats
        "#;

        let row = sqlx::query(query)
            .bind(driver_id)
            .bind(plate_number)
            .bind(brand)
            .bind(model)
            .bind(color)
            .bind(seats)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                PostgresError::conflict_on_unique(e, "plate number already registered")
            })?;

        Ok(Vehicle {
            id: row.get("id"),
            driver_id: row.get("driver_id"),
            plate_number: row.get("plate_number"),
            brand: row.get("brand"),
            model: row.get("model"),
            color: row.get("color"),
            seats: row.get("seats"),
        })
    }

    /// Fetch the location with this name, inserting it first if absent.
    ///
    /// The no-op DO UPDATE makes RETURNING yield the existing row, so a
    /// re-used place name keeps its original coordinates.
    pub async fn get_or_create_location(
        &self,
        name: &str,
        point: GeoPoint,
        address_detail: &str,
    ) -> Result<Location, PostgresError> {
        let query = r#"
            INSERT INTO locations (name, longitude, latitude, address_detail)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name)
            DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, longitude, latitude, address_detail
        "#;

        let row = sqlx::query(query)
            .bind(name)
            .bind(point.longitude)
            .bind(point.latitude)
            .bind(address_detail)
            .fetch_one(&self.pool)
            .await?;

        Ok(location_from_row(&row, ""))
    }

    /// Insert a passenger ride request and return its id
    pub async fn create_passenger_request(
        &self,
        passenger_id: i64,
        origin_id: i64,
        destination_id: i64,
        departure_time: chrono::DateTime<chrono::Utc>,
        seats_needed: i32,
    ) -> Result<i64, PostgresError> {
        let query = r#"
            INSERT INTO passenger_requests (passenger_id, origin_id, destination_id, departure_time, seats_needed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(passenger_id)
            .bind(origin_id)
            .bind(destination_id)
            .bind(departure_time)
            .bind(seats_needed)
            .fetch_one(&self.pool)
            .await?;

        let id: i64 = row.get("id");

        tracing::debug!("Created ride request {} for user {}", id, passenger_id);

        Ok(id)
    }

    /// List all stored ride requests with joined endpoints and passenger
    /// identity, in insertion order.
    pub async fn list_requests(&self) -> Result<Vec<PassengerRequest>, PostgresError> {
        let query = r#"
            SELECT
                r.id, r.passenger_id, r.departure_time, r.seats_needed, r.created_at,
                u.username AS passenger_username, u.phone AS passenger_phone,
                o.id AS origin_id, o.name AS origin_name,
                o.longitude AS origin_longitude, o.latitude AS origin_latitude,
                o.address_detail AS origin_address_detail,
                d.id AS destination_id, d.name AS destination_name,
                d.longitude AS destination_longitude, d.latitude AS destination_latitude,
                d.address_detail AS destination_address_detail
            FROM passenger_requests r
            JOIN users u ON u.id = r.passenger_id
            JOIN locations o ON o.id = r.origin_id
            JOIN locations d ON d.id = r.destination_id
            ORDER BY r.id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let requests = rows
            .iter()
            .map(|row| PassengerRequest {
                id: row.get("id"),
                passenger_id: row.get("passenger_id"),
                passenger_username: row.get("passenger_username"),
                passenger_phone: row.get("passenger_phone"),
                origin: location_from_row(row, "origin_"),
                destination: location_from_row(row, "destination_"),
                departure_time: row.get("departure_time"),
                seats_needed: row.get("seats_needed"),
                created_at: row.get("created_at"),
            })
            .collect();

        Ok(requests)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        phone: row.get("phone"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get::<UserRole, _>("role"),
        status: row.get::<UserStatus, _>("status"),
        registered_at: row.get("registered_at"),
    }
}

fn driver_from_row(row: &sqlx::postgres::PgRow) -> Driver {
    Driver {
        id: row.get("id"),
        user_id: row.get("user_id"),
        license_number: row.get("license_number"),
        approval_status: row.get::<ApprovalStatus, _>("approval_status"),
        rating: row.get("rating"),
    }
}

fn location_from_row(row: &sqlx::postgres::PgRow, prefix: &str) -> Location {
    Location {
        id: row.get(format!("{}id", prefix).as_str()),
        name: row.get(format!("{}name", prefix).as_str()),
        longitude: row.get(format!("{}longitude", prefix).as_str()),
        latitude: row.get(format!("{}latitude", prefix).as_str()),
        address_detail: row.get(format!("{}address_detail", prefix).as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_payload() {
        let user = NewUser {
            username: "rider".to_string(),
            phone: "13800000000".to_string(),
            email: None,
            password_hash: "$2b$12$hash".to_string(),
            role: UserRole::Passenger,
        };

        assert_eq!(user.role, UserRole::Passenger);
        assert!(user.email.is_none());
    }
}
