// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ApprovalStatus, Driver, GeoPoint, Location, PassengerRequest, User, UserRole, UserStatus,
    Vehicle,
};
pub use requests::{
    CreateRideRequest, LoginRequest, RegisterDriverRequest, RegisterRequest,
    RegisterVehicleRequest, SearchRidesRequest,
};
pub use responses::{
    AuthResponse, CreateRideResponse, ErrorResponse, HealthResponse, PassengerInfo, RideSummary,
    SearchRidesResponse,
};
