// src/services/gemini.rs
use crate::config::Config;
use crate::errors::PaintError;
use crate::models::GeneratedImage;
use crate::prompt::{self, ImagePrompt, ReferenceImageInput};
use crate::services::ImageModel;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::{Duration, Instant};

/// Removes a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````)
/// from model output.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`), whether or not a newline follows it.
    let info_len = rest
        .find(|c: char| c.is_whitespace() || c == '{' || c == '[')
        .unwrap_or(rest.len());
    let body = rest[info_len..].trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn analysis_instruction() -> String {
    let mut template = prompt::create_default();
    template
        .objects
        .push(prompt::create_default_object("obj_001"));
    let template = serde_json::to_string_pretty(&template).unwrap_or_default();

    format!(
        r##"Analyze this image in detail for AI image generation and describe it as a structured prompt.

Return ONLY a JSON document with exactly this shape (values below are placeholders):
{template}

Rules:
- "objects" lists every distinct subject, garment, prop or graphic element, with ids "obj_001", "obj_002", ... in order.
- meta.image_quality is one of: {quality}.
- compression_artifacts, noise_level and reflectivity are one of: {intensity}.
- color_palette.contrast_level is one of: {contrast}.
- category is one of: {category}.
- dimensions_relative is one of: {size}.
- distance_from_camera is one of: {distance}.
- relationships[].type is one of: {relationship}.
- bounding_box_percentage values are fractions between 0 and 1.
- Colours are hex strings like "#1A2B3C".
- Optional keys: interaction_with_light, text_content, relationships, surface_properties.wear_state. Omit them when not applicable.
- Do not include reference_image."##,
        quality = prompt::ImageQuality::VARIANTS.join(", "),
        intensity = prompt::Intensity::VARIANTS.join(", "),
        contrast = prompt::ContrastLevel::VARIANTS.join(", "),
        category = prompt::ObjectCategory::VARIANTS.join(", "),
        size = prompt::RelativeSize::VARIANTS.join(", "),
        distance = prompt::CameraDistance::VARIANTS.join(", "),
        relationship = prompt::RelationshipKind::VARIANTS.join(", "),
    )
}

fn response_parts(result: &Value) -> &[Value] {
    result["candidates"][0]["content"]["parts"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub struct GeminiService {
    api_key: Option<String>,
    base_url: String,
    analysis_model: String,
    generation_model: String,
    client: Client,
}

impl GeminiService {
    pub fn new(config: &Config) -> Result<Self, PaintError> {
        if config.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY is not set. Analysis and generation will not work.");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PaintError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.clone(),
            analysis_model: config.analysis_model.clone(),
            generation_model: config.generation_model.clone(),
            client,
        })
    }

    async fn generate_content(&self, model: &str, body: Value) -> Result<Value, PaintError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| {
                PaintError::RemoteService("Gemini API key is not configured".to_string())
            })?;

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaintError::RemoteService(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PaintError::RemoteService(format!(
                "Gemini error ({}): {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            PaintError::RemoteService(format!("Failed to parse Gemini response: {}", e))
        })
    }
}

#[async_trait]
impl ImageModel for GeminiService {
    async fn analyze(
        &self,
        image_base64: &str,
        mime_type: &str,
    ) -> Result<ImagePrompt, PaintError> {
        let start = Instant::now();

        let result = self
            .generate_content(
                &self.analysis_model,
                json!({
                    "contents": [{
                        "parts": [
                            { "text": analysis_instruction() },
                            { "inlineData": { "mimeType": mime_type, "data": image_base64 } }
                        ]
                    }],
                    "generationConfig": { "responseMimeType": "application/json" }
                }),
            )
            .await?;

        let text = response_parts(&result)
            .iter()
            .find_map(|part| part["text"].as_str())
            .ok_or_else(|| PaintError::RemoteService("No text in analysis response".to_string()))?;

        let candidate: Value = serde_json::from_str(strip_code_fences(text)).map_err(|e| {
            PaintError::RemoteService(format!("Failed to parse analysis JSON: {}", e))
        })?;

        let prompt = prompt::validate(&candidate).map_err(|errors| {
            PaintError::RemoteService(format!("Analysis returned an invalid prompt: {}", errors))
        })?;

        info!(
            "Analyzed image with {} in {} ms ({} object(s))",
            self.analysis_model,
            start.elapsed().as_millis(),
            prompt.objects.len()
        );
        Ok(prompt)
    }

    async fn generate(
        &self,
        instruction: &str,
        references: &[ReferenceImageInput],
    ) -> Result<GeneratedImage, PaintError> {
        let start = Instant::now();

        let mut parts = vec![json!({ "text": instruction })];
        parts.extend(references.iter().map(|image| {
            json!({ "inlineData": { "mimeType": image.mime_type, "data": image.data } })
        }));
        debug!("Generating with {} reference image(s)", references.len());

        let result = self
            .generate_content(
                &self.generation_model,
                json!({
                    "contents": [{ "parts": parts }],
                    "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
                }),
            )
            .await?;

        let inline = response_parts(&result)
            .iter()
            .map(|part| &part["inlineData"])
            .find(|inline| inline.is_object())
            .ok_or_else(|| {
                PaintError::RemoteService("No image generated in response".to_string())
            })?;

        let encoded = inline["data"]
            .as_str()
            .ok_or_else(|| PaintError::RemoteService("Image part has no data".to_string()))?;
        let data = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| PaintError::RemoteService(format!("Failed to decode image: {}", e)))?;
        let mime_type = inline["mimeType"].as_str().unwrap_or("image/png").to_string();

        info!(
            "Generated {} ({} bytes) with {} in {} ms",
            mime_type,
            data.len(),
            self.generation_model,
            start.elapsed().as_millis()
        );
        Ok(GeneratedImage {
            mime_type,
            data: data.into(),
        })
    }
}
