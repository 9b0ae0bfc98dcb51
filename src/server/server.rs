//! HTTP server core implementation

use crate::config::ServerConfig;
use crate::server::handlers::{json_config, query_config};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{AppError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::io;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            config: state.config.server().clone(),
            state,
        }
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let body_limit = state.config.server().max_body_size;

        App::new()
            .app_data(state)
            .app_data(json_config(body_limit))
            .app_data(query_config())
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", crate::NAME)))
            .configure(routes::configure_routes)
    }

    /// Start the HTTP server and run until it is stopped
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| format_bind_error(e, &bind_addr))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| AppError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

fn format_bind_error(error: io::Error, bind_addr: &str) -> AppError {
    match error.kind() {
        io::ErrorKind::AddrInUse => {
            AppError::server(format!("{} is already in use: {}", bind_addr, error))
        }
        io::ErrorKind::PermissionDenied => AppError::server(format!(
            "Permission denied binding {}; ports below 1024 need elevated privileges",
            bind_addr
        )),
        _ => AppError::server(format!("Failed to bind {}: {}", bind_addr, error)),
    }
}
