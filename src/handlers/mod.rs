// src/handlers/mod.rs
use crate::errors::PaintError;
use crate::prompt::{self, suggestions};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures_util::TryStreamExt;

pub mod generation;
pub mod history;
pub mod sessions;

pub use generation::{analyze_image, generate_image};
pub use history::{clear_history, list_history, remove_history_item};

/// Upper bound for request bodies and uploaded files; base64 images are large.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Registers every route. Shared by the server binary and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(|err, _req| PaintError::Parse(err.to_string()).into()),
    )
    .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
    .route("/health", web::get().to(health_check))
    .service(
        web::scope("/api")
            .route("/options", web::get().to(options))
            .route("/analyze", web::post().to(analyze_image))
            .route("/generate", web::post().to(generate_image))
            .route("/validate", web::post().to(validate_prompt))
            .route("/history", web::get().to(list_history))
            .route("/history", web::delete().to(clear_history))
            .route("/history/{id}", web::delete().to(remove_history_item))
            .service(sessions::scope()),
    );
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "paint",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn options() -> HttpResponse {
    HttpResponse::Ok().json(suggestions::catalog())
}

pub(crate) fn utf8_body(body: &[u8]) -> Result<&str, PaintError> {
    std::str::from_utf8(body).map_err(|e| PaintError::Parse(format!("Body is not UTF-8: {}", e)))
}

/// Checks raw JSON text without touching any session.
pub async fn validate_prompt(body: web::Bytes) -> Result<HttpResponse, Error> {
    let prompt = prompt::validate_str(utf8_body(&body)?)
        .map_err(|e| PaintError::Parse(e.to_string()))?
        .map_err(PaintError::Validation)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "prompt": prompt
    })))
}

/// First file field of a multipart upload.
pub(crate) struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

pub(crate) async fn read_first_file(mut payload: Multipart) -> Result<UploadedFile, Error> {
    while let Some(mut field) = payload.try_next().await? {
        let Some(filename) = field
            .content_disposition()
            .get_filename()
            .map(|name| name.to_string())
        else {
            continue;
        };

        // Collect file data
        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            if data.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(PaintError::Parse(format!(
                    "Upload exceeds {} bytes",
                    MAX_BODY_BYTES
                ))
                .into());
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(UploadedFile { filename, data });
    }

    Err(PaintError::Parse("No file provided".to_string()).into())
}
