// src/services/image_processor.rs
use crate::errors::PaintError;
use crate::prompt::ReferenceImage;
use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, GenericImageView, ImageFormat as ImgFormat};
use log::debug;

const MAX_ACCEPTED_DIMENSION: u32 = 4096;

/// Image bytes ready to be forwarded to the remote model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

impl PreparedImage {
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }
}

pub struct ImageProcessor {
    max_dimension: u32,
}

impl ImageProcessor {
    pub fn new(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    /// Decodes a base64 payload, accepting an optional `data:<mime>;base64,` prefix.
    pub fn decode_base64(&self, payload: &str) -> Result<Vec<u8>, PaintError> {
        let body = match payload.split_once(";base64,") {
            Some((prefix, body)) if prefix.starts_with("data:") => body,
            _ => payload,
        };
        general_purpose::STANDARD
            .decode(body.trim())
            .map_err(|e| PaintError::ImageProcessing(format!("Invalid base64 image data: {}", e)))
    }

    pub fn detect_mime_type(&self, data: &[u8]) -> Result<&'static str, PaintError> {
        let format = image::guess_format(data)
            .map_err(|e| PaintError::ImageProcessing(format!("Unrecognised image: {}", e)))?;
        match format {
            ImgFormat::Png => Ok("image/png"),
            ImgFormat::Jpeg => Ok("image/jpeg"),
            ImgFormat::Gif => Ok("image/gif"),
            ImgFormat::WebP => Ok("image/webp"),
            other => Err(PaintError::ImageProcessing(format!(
                "Unsupported image format: {:?}",
                other
            ))),
        }
    }

    /// Decodes `data` once and enforces the acceptance limit.
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, PaintError> {
        let img = image::load_from_memory(data)
            .map_err(|e| PaintError::ImageProcessing(format!("Invalid image format: {}", e)))?;

        let (width, height) = img.dimensions();
        if width > MAX_ACCEPTED_DIMENSION || height > MAX_ACCEPTED_DIMENSION {
            return Err(PaintError::ImageProcessing(format!(
                "Image dimensions exceed {0}x{0}",
                MAX_ACCEPTED_DIMENSION
            )));
        }

        Ok(img)
    }

    pub fn validate_image(&self, data: &[u8]) -> Result<(u32, u32), PaintError> {
        self.decode(data).map(|img| img.dimensions())
    }

    /// Validates `data` and downscales it to PNG when either side exceeds the
    /// configured maximum.
    pub fn prepare(&self, data: &[u8]) -> Result<PreparedImage, PaintError> {
        let mime_type = self.detect_mime_type(data)?;
        let img = self.decode(data)?;
        let (width, height) = img.dimensions();

        if width <= self.max_dimension && height <= self.max_dimension {
            return Ok(PreparedImage {
                data: data.to_vec(),
                mime_type: mime_type.to_string(),
                width,
                height,
            });
        }

        let ratio = (self.max_dimension as f32 / width.max(height) as f32).min(1.0);
        let new_width = ((width as f32 * ratio) as u32).max(1);
        let new_height = ((height as f32 * ratio) as u32).max(1);
        debug!("Downscaling image {width}x{height} -> {new_width}x{new_height}");

        let resized = img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3);
        let (width, height) = resized.dimensions();

        let mut output = Vec::new();
        resized
            .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Png)
            .map_err(|e| {
                PaintError::ImageProcessing(format!("Failed to encode resized image: {}", e))
            })?;

        Ok(PreparedImage {
            data: output,
            mime_type: "image/png".to_string(),
            width,
            height,
        })
    }

    /// Turns an uploaded file into a reference image for a prompt object.
    pub fn to_reference_image(
        &self,
        data: &[u8],
        name: &str,
    ) -> Result<ReferenceImage, PaintError> {
        let prepared = self.prepare(data)?;
        Ok(ReferenceImage {
            data: prepared.to_base64(),
            mime_type: prepared.mime_type,
            name: name.to_string(),
        })
    }
}
