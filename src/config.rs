// src/config.rs
use crate::errors::PaintError;
use crate::models::PromptFormat;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub analysis_model: String,
    pub generation_model: String,
    pub redis_url: Option<String>,
    pub static_dir: Option<PathBuf>,
    pub max_image_dimension: u32,
    pub history_limit: usize,
    pub prompt_format: PromptFormat,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            analysis_model: "gemini-2.0-flash".into(),
            generation_model: "gemini-2.0-flash-exp-image-generation".into(),
            redis_url: None,
            static_dir: None,
            max_image_dimension: 2048,
            history_limit: 50,
            prompt_format: PromptFormat::Json,
            request_timeout_secs: 120,
        }
    }
}

fn parsed<T>(key: &str, raw: Option<String>, default: T) -> Result<T, PaintError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| PaintError::Config(format!("{key}={value:?}: {e}"))),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, PaintError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset or empty keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaintError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            bind_addr: get("PAINT_BIND_ADDR").unwrap_or(defaults.bind_addr),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_base_url: get("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_base_url),
            analysis_model: get("PAINT_ANALYSIS_MODEL").unwrap_or(defaults.analysis_model),
            generation_model: get("PAINT_GENERATION_MODEL").unwrap_or(defaults.generation_model),
            redis_url: get("REDIS_URL"),
            static_dir: get("PAINT_STATIC_DIR").map(PathBuf::from),
            max_image_dimension: parsed(
                "PAINT_MAX_IMAGE_DIMENSION",
                get("PAINT_MAX_IMAGE_DIMENSION"),
                defaults.max_image_dimension,
            )?,
            history_limit: parsed(
                "PAINT_HISTORY_LIMIT",
                get("PAINT_HISTORY_LIMIT"),
                defaults.history_limit,
            )?,
            prompt_format: parsed(
                "PAINT_PROMPT_FORMAT",
                get("PAINT_PROMPT_FORMAT"),
                defaults.prompt_format,
            )?,
            request_timeout_secs: parsed(
                "PAINT_REQUEST_TIMEOUT_SECS",
                get("PAINT_REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, PaintError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.prompt_format, PromptFormat::Json);
        assert!(config.gemini_api_key.is_none());
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_BASE_URL", "http://localhost:9000/"),
            ("PAINT_HISTORY_LIMIT", "10"),
            ("PAINT_PROMPT_FORMAT", "text"),
            ("REDIS_URL", ""),
        ])
        .unwrap();
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_base_url, "http://localhost:9000");
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.prompt_format, PromptFormat::Text);
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert_matches!(
            config_from(&[("PAINT_MAX_IMAGE_DIMENSION", "huge")]),
            Err(PaintError::Config(msg)) if msg.contains("PAINT_MAX_IMAGE_DIMENSION")
        );
    }
}
