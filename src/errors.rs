// src/errors.rs
use crate::prompt::ValidationErrors;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PaintError {
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Remote service error: {0}")]
    RemoteService(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("History storage error: {0}")]
    History(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("History item not found: {0}")]
    HistoryItemNotFound(String),

    #[error("Index {index} is out of range for {len} object(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResponseError for PaintError {
    fn status_code(&self) -> StatusCode {
        match self {
            PaintError::Validation(_)
            | PaintError::Parse(_)
            | PaintError::ImageProcessing(_)
            | PaintError::IndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
            PaintError::SessionNotFound(_)
            | PaintError::ObjectNotFound(_)
            | PaintError::HistoryItemNotFound(_) => StatusCode::NOT_FOUND,
            PaintError::RemoteService(_) => StatusCode::BAD_GATEWAY,
            PaintError::History(_) | PaintError::Serialization(_) | PaintError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            PaintError::Validation(errors) => serde_json::json!({
                "success": false,
                "error": self.to_string(),
                "details": errors,
            }),
            _ => serde_json::json!({
                "success": false,
                "error": self.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ValidationError;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let validation = PaintError::Validation(ValidationErrors(vec![ValidationError {
            path: "meta.image_quality".to_string(),
            reason: "bad".to_string(),
        }]));
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            PaintError::RemoteService("down".to_string()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            PaintError::ObjectNotFound("obj_009".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PaintError::History("io".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
