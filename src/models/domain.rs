use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A named place with resolved coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "addressDetail", default)]
    pub address_detail: Option<String>,
}

impl Location {
    /// The location's coordinates as a point value
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Display label, preferring the provider's formatted address
    pub fn label(&self) -> &str {
        self.address_detail
            .as_deref()
            .filter(|detail| !detail.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Passenger,
    Driver,
}

/// Account standing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Banned,
}

/// Registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(rename = "registeredAt")]
    pub registered_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn banned(&self) -> bool {
        self.status == UserStatus::Banned
    }
}

/// Review state of a driver record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "approval_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Driver record attached to a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "licenseNumber")]
    pub license_number: String,
    #[serde(rename = "approvalStatus")]
    pub approval_status: ApprovalStatus,
    pub rating: f64,
}

/// Vehicle registered to a driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(rename = "driverId")]
    pub driver_id: i64,
    #[serde(rename = "plateNumber")]
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub seats: i32,
}

/// A stored ride request with resolved endpoints and owner identity.
///
/// Origin and destination are always geocoded before the request is
/// persisted; a request never exists with unresolved endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassengerRequest {
    pub id: i64,
    #[serde(rename = "passengerId")]
    pub passenger_id: i64,
    #[serde(rename = "passengerUsername")]
    pub passenger_username: String,
    #[serde(rename = "passengerPhone")]
    pub passenger_phone: String,
    pub origin: Location,
    pub destination: Location,
    #[serde(rename = "departureTime")]
    pub departure_time: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "seatsNeeded")]
    pub seats_needed: i32,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}
