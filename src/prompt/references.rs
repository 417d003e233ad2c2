// src/prompt/references.rs
//! Separates per-object reference images from the text-representable document.
//!
//! Reference payloads travel to the generation model as their own multimodal
//! parts, so they must never end up inside the serialized instruction.
use super::*;

/// A reference image as sent to the generation model; the display name is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImageInput {
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// Collects every attached reference image in object order.
pub fn extract_reference_images(prompt: &ImagePrompt) -> Vec<ReferenceImageInput> {
    prompt
        .objects
        .iter()
        .filter_map(|obj| obj.reference_image.as_ref())
        .filter(|image| !image.data.is_empty() && !image.mime_type.is_empty())
        .map(|image| ReferenceImageInput {
            data: image.data.clone(),
            mime_type: image.mime_type.clone(),
        })
        .collect()
}

/// Copy of `prompt` with every `reference_image` removed.
pub fn strip_reference_images(prompt: &ImagePrompt) -> ImagePrompt {
    let mut stripped = prompt.clone();
    for obj in &mut stripped.objects {
        obj.reference_image = None;
    }
    stripped
}
