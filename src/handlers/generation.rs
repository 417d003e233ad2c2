// src/handlers/generation.rs
use crate::AppState;
use crate::errors::PaintError;
use crate::models::{AnalyzeRequest, GenerateRequest, PromptFormat};
use crate::prompt::{self, ImagePrompt};
use crate::services::prepare_generation;
use actix_web::{Error, HttpResponse, web};
use log::{info, warn};
use serde_json::{Value, json};

pub async fn analyze_image(
    body: web::Json<AnalyzeRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let request = body.into_inner();
    if request.image.trim().is_empty() || request.mime_type.trim().is_empty() {
        return Err(PaintError::Parse("Image data and mimeType are required".to_string()).into());
    }

    let raw = data.image_processor.decode_base64(&request.image)?;
    let prepared = data.image_processor.prepare(&raw)?;
    if prepared.mime_type != request.mime_type {
        info!(
            "Declared {} but forwarding {} to analysis",
            request.mime_type, prepared.mime_type
        );
    }

    let prompt = data
        .image_model
        .analyze(&prepared.to_base64(), &prepared.mime_type)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "prompt": prompt
    })))
}

/// Renders `prompt`, calls the generation model and records the image in history.
pub(crate) async fn run_generation(
    data: &AppState,
    prompt: &ImagePrompt,
    format: PromptFormat,
) -> Result<Value, PaintError> {
    let input = prepare_generation(prompt, format)?;
    let image = data
        .image_model
        .generate(&input.instruction, &input.references)
        .await?;
    let data_uri = image.to_data_uri();

    // The image is still returned when history storage fails.
    let history_id = match data.history.add(data_uri.clone()).await {
        Ok(item) => Some(item.id),
        Err(e) => {
            warn!("Failed to record generated image in history: {}", e);
            None
        }
    };

    Ok(json!({
        "success": true,
        "image": data_uri,
        "prompt": input.instruction,
        "historyId": history_id
    }))
}

pub async fn generate_image(
    body: web::Json<GenerateRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let request = body.into_inner();
    let prompt = prompt::validate(&request.prompt).map_err(PaintError::Validation)?;
    let format = request.format.unwrap_or(data.prompt_format);

    let response = run_generation(&data, &prompt, format).await?;
    Ok(HttpResponse::Ok().json(response))
}
