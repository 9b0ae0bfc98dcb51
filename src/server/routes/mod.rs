//! HTTP route modules
//!
//! Each module registers its own paths through `configure_routes`.

pub mod alerts;
pub mod health;
pub mod sound;
pub mod webhook;
pub mod ws;

use actix_web::web;

/// Register every route of the service
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(webhook::configure_routes)
        .configure(alerts::configure_routes)
        .configure(ws::configure_routes)
        .configure(sound::configure_routes)
        .configure(health::configure_routes);
}
