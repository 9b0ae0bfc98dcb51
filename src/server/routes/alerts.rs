//! Alert listing, acknowledgement and clearing

use crate::server::state::AppState;
use crate::utils::error::{AppError, Result};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/acknowledge", web::post().to(acknowledge))
        .route("/clear", web::post().to(clear))
        .route("/status", web::get().to(status))
        .route("/api/alerts", web::get().to(list_alerts));
}

#[derive(Debug, Deserialize)]
struct AcknowledgeQuery {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    has_unacknowledged: bool,
}

async fn acknowledge(
    state: web::Data<AppState>,
    query: web::Query<AcknowledgeQuery>,
) -> Result<HttpResponse> {
    let id = query.id.trim();
    if id.is_empty() {
        return Err(AppError::bad_request("Missing 'id' parameter"));
    }

    state.store.acknowledge(id);
    Ok(HttpResponse::Ok().content_type("text/plain").body("OK"))
}

async fn clear(state: web::Data<AppState>) -> HttpResponse {
    let cleared = state.store.clear_acknowledged_and_resolved();
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(format!("Cleared {} alerts", cleared))
}

async fn status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        has_unacknowledged: state.store.has_unacknowledged_firing(),
    })
}

async fn list_alerts(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = state.store.snapshot();
    debug!(
        "Listing {} alerts at revision {}",
        snapshot.alerts.len(),
        snapshot.revision
    );
    HttpResponse::Ok().json(snapshot)
}
