//! Serves the configured alarm sound

use crate::server::state::AppState;
use crate::utils::error::{AppError, Result};
use actix_files::NamedFile;
use actix_web::http::header::{CONTENT_TYPE, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, web};
use std::path::Path;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sound", web::get().to(sound));
}

/// Content type by extension; unknown extensions are served as WAV
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("mp3") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        _ => "audio/wav",
    }
}

async fn sound(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let path = state.config.alarm().sound_path();
    if !path.is_file() {
        return Err(AppError::not_found(format!(
            "Sound file not found: {}",
            path.display()
        )));
    }

    let file = NamedFile::open_async(&path).await?;
    let mut response = file.into_response(&req);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type_for(&path)));
    Ok(response)
}
