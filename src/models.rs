// src/models.rs
use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a document is rendered into the generation model's text instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptFormat {
    /// Pretty JSON of the document with reference images stripped.
    #[default]
    Json,
    /// The flattened natural-language paragraph.
    Text,
}

impl FromStr for PromptFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            other => Err(format!("unknown prompt format '{other}', expected json or text")),
        }
    }
}

impl fmt::Display for PromptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Text => "text",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 payload, optionally as a full data URI.
    pub image: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    /// Untrusted document; validated before use.
    pub prompt: serde_json::Value,
    #[serde(default)]
    pub format: Option<PromptFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateOptions {
    #[serde(default)]
    pub format: Option<PromptFormat>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub from_index: usize,
    pub to_index: usize,
}

/// One generated image kept in the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    /// Data URI of the image.
    pub image: String,
    /// Epoch milliseconds.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// Raw image bytes returned by the generation model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: Bytes,
}

impl GeneratedImage {
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.data)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_encodes_payload() {
        let image = GeneratedImage {
            mime_type: "image/png".to_string(),
            data: Bytes::from_static(b"hello"),
        };
        assert_eq!(image.to_data_uri(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn prompt_format_parses_case_insensitively() {
        assert_eq!("TEXT".parse::<PromptFormat>(), Ok(PromptFormat::Text));
        assert!("yaml".parse::<PromptFormat>().is_err());
        let parsed: GenerateOptions = serde_json::from_str(r#"{"format":"text"}"#).unwrap();
        assert_eq!(parsed.format, Some(PromptFormat::Text));
    }

    #[test]
    fn history_item_uses_camel_case_timestamp() {
        let item = HistoryItem {
            id: "1700000000000-abc1234".to_string(),
            image: "data:image/png;base64,AA==".to_string(),
            created_at: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["createdAt"], 1_700_000_000_000i64);
    }
}
