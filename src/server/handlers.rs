//! Extractor configuration shared by all routes

use crate::utils::error::AppError;
use actix_web::{HttpRequest, error, web};
use tracing::debug;

/// JSON bodies: size limit plus a 400 with the standard error body
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, req| {
            debug!("Rejected JSON body on {}: {}", req.path(), err);
            json_error(err, req)
        })
}

/// Query strings: 400 with the standard error body
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::bad_request(err.to_string()).into())
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        error::JsonPayloadError::OverflowKnownLength { .. }
        | error::JsonPayloadError::Overflow { .. } => {
            AppError::bad_request("Payload too large").into()
        }
        other => AppError::bad_request(format!("Invalid JSON: {}", other)).into(),
    }
}
