// src/lib.rs
//! Structured image-prompt editing service.
//!
//! The [`prompt`] module holds the document model and its pure operations.
//! [`services`] wraps the remote model, history storage and editing sessions.
//! [`handlers`] exposes both over HTTP.
use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod services;

pub use config::Config;
pub use errors::PaintError;

use crate::models::PromptFormat;
use crate::services::{HistoryService, ImageModel, ImageProcessor, SessionRegistry};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub history: Arc<HistoryService>,
    pub image_model: Arc<dyn ImageModel>,
    pub image_processor: Arc<ImageProcessor>,
    /// Instruction format used when a generate request does not name one.
    pub prompt_format: PromptFormat,
}
