// src/services/generation.rs
use crate::errors::PaintError;
use crate::models::PromptFormat;
use crate::prompt::{self, ImagePrompt, ReferenceImageInput};

/// What is sent to the generation model for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInput {
    pub instruction: String,
    pub references: Vec<ReferenceImageInput>,
}

/// Splits reference images out of `prompt` and renders the rest as the text
/// instruction in the requested format.
pub fn prepare_generation(
    prompt: &ImagePrompt,
    format: PromptFormat,
) -> Result<GenerationInput, PaintError> {
    let references = prompt::extract_reference_images(prompt);
    let stripped = prompt::strip_reference_images(prompt);

    let instruction = match format {
        PromptFormat::Json => serde_json::to_string_pretty(&stripped)
            .map_err(|e| PaintError::Serialization(e.to_string()))?,
        PromptFormat::Text => prompt::flatten(&stripped),
    };

    Ok(GenerationInput {
        instruction,
        references,
    })
}
