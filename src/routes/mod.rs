pub mod health;
pub mod auth;
pub mod foods;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .service(health::list_tables)
            .configure(auth::auth_routes)
            .configure(foods::foods_routes)
    );
}
