//! Health check and version endpoints

use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/version", web::get().to(version_info));
}

/// Basic health check endpoint
///
/// Always 200 while the process serves requests; the body carries enough
/// engine state to tell a stuck alarm from a quiet one.
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let health_status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime_seconds: state.uptime_seconds(),
        alerts: state.store.len(),
        has_unacknowledged: state.store.has_unacknowledged_firing(),
        subscribers: state.hub.subscriber_count().await,
        alarm: AlarmStatus {
            looping: state.alarm.is_looping(),
            player: state.alarm.player_name().to_string(),
            cycles: state.alarm.cycles(),
        },
    };

    HttpResponse::Ok().json(health_status)
}

async fn version_info() -> HttpResponse {
    HttpResponse::Ok().json(VersionInfo {
        name: Cow::Borrowed(env!("CARGO_PKG_NAME")),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        build_time: Cow::Borrowed(env!("BUILD_TIME")),
        git_hash: Cow::Borrowed(env!("GIT_HASH")),
        rust_version: Cow::Borrowed(env!("RUST_VERSION")),
    })
}

#[derive(Debug, Clone, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
    uptime_seconds: u64,
    alerts: usize,
    has_unacknowledged: bool,
    subscribers: usize,
    alarm: AlarmStatus,
}

#[derive(Debug, Clone, serde::Serialize)]
struct AlarmStatus {
    looping: bool,
    player: String,
    cycles: u64,
}

#[derive(Debug, Clone, serde::Serialize)]
struct VersionInfo {
    name: Cow<'static, str>,
    version: Cow<'static, str>,
    build_time: Cow<'static, str>,
    git_hash: Cow<'static, str>,
    rust_version: Cow<'static, str>,
}
