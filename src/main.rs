// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use log::{info, warn};
use paint::services::{
    GeminiService, HistoryBackend, HistoryService, ImageProcessor, MemoryHistoryBackend,
    RedisHistoryBackend, SessionRegistry,
};
use paint::{AppState, Config, handlers};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting paint service...");

    let config = Config::from_env().context("invalid configuration")?;

    // Initialize services
    let backend: Arc<dyn HistoryBackend> = match config.redis_url.as_deref() {
        Some(url) => Arc::new(
            RedisHistoryBackend::new(url)
                .await
                .context("failed to connect to Redis")?,
        ),
        None => {
            warn!("REDIS_URL is not set. History will not survive a restart.");
            Arc::new(MemoryHistoryBackend::default())
        }
    };
    let history = Arc::new(HistoryService::load(backend, config.history_limit).await?);
    let image_model = Arc::new(GeminiService::new(&config)?);
    let image_processor = Arc::new(ImageProcessor::new(config.max_image_dimension));

    let app_state = AppState {
        sessions: Arc::new(SessionRegistry::new()),
        history,
        image_model,
        image_processor,
        prompt_format: config.prompt_format,
    };

    let static_dir = config.static_dir.clone();
    info!("Starting HTTP server on {}", config.bind_addr);

    HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure);

        match &static_dir {
            Some(dir) => app.service(actix_files::Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}
