//! Websocket endpoint for live updates

use crate::hub::session;
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws", web::get().to(websocket));
}

/// Upgrade and hand the connection to a session task.
///
/// The subscription is registered before the initial snapshot is taken,
/// so no change can fall between the two.
async fn websocket(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> actix_web::Result<HttpResponse> {
    let (response, ws_session, messages) = actix_ws::handle(&req, body)?;

    let subscription = state.hub.register(None);
    let initial = state.publisher.render()?;
    debug!(
        "Websocket subscriber {} connected at revision {}",
        subscription.id(),
        initial.revision
    );

    actix_web::rt::spawn(session::run(
        ws_session,
        messages,
        subscription,
        initial,
        state.session_config(),
    ));

    Ok(response)
}
