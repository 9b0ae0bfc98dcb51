//! Alertmanager webhook receiver

use crate::alerts::WebhookPayload;
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhook", web::post().to(receive_webhook));
}

/// Ingest one notification
async fn receive_webhook(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<WebhookPayload>,
) -> HttpResponse {
    let payload = payload.into_inner();
    let count = payload.alerts.len();
    let status = payload.status.clone();

    let report = state.store.ingest(payload);

    let peer = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();
    info!(
        "Received webhook: {} alerts, status: {} from IP: {} ({} stored, {} resolved, {} ignored)",
        count, status, peer, report.accepted, report.resolved, report.discarded
    );

    HttpResponse::Ok().content_type("text/plain").body("OK")
}
