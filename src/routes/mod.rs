// Route exports
pub mod drivers;
pub mod rides;
pub mod users;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(users::configure)
            .configure(drivers::configure)
            .configure(rides::configure),
    );
}
