// src/handlers/history.rs
use crate::AppState;
use crate::errors::PaintError;
use actix_web::{Error, HttpResponse, web};
use serde_json::json;

pub async fn list_history(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "items": data.history.list().await
    }))
}

pub async fn remove_history_item(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();
    if !data.history.remove(&id).await? {
        return Err(PaintError::HistoryItemNotFound(id).into());
    }
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub async fn clear_history(data: web::Data<AppState>) -> Result<HttpResponse, Error> {
    data.history.clear().await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
