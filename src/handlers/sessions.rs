// src/handlers/sessions.rs
//! Session-scoped editing endpoints.
//!
//! Each mutation runs through [`SessionRegistry::edit`](crate::services::SessionRegistry::edit),
//! so a rejected change never reaches the stored document.
use super::{read_first_file, utf8_body};
use crate::AppState;
use crate::errors::PaintError;
use crate::models::{GenerateOptions, ReorderRequest};
use crate::prompt::{
    self, ColorPalettePatch, CompositionPatch, GlobalContextPatch, ImagePrompt, LightingPatch,
    MetaPatch, PromptObjectPatch,
};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, Scope, web};
use serde_json::json;
use uuid::Uuid;

pub fn scope() -> Scope {
    web::scope("/sessions")
        .route("", web::post().to(create_session))
        .route("", web::get().to(list_sessions))
        .route("/{sid}", web::get().to(get_session))
        .route("/{sid}", web::delete().to(delete_session))
        .route("/{sid}/meta", web::patch().to(update_meta))
        .route("/{sid}/global-context", web::patch().to(update_global_context))
        .route("/{sid}/lighting", web::patch().to(update_lighting))
        .route("/{sid}/color-palette", web::patch().to(update_color_palette))
        .route("/{sid}/composition", web::patch().to(update_composition))
        .route("/{sid}/objects", web::post().to(add_object))
        .route("/{sid}/objects/reorder", web::post().to(reorder_objects))
        .route("/{sid}/objects/{oid}", web::patch().to(update_object))
        .route("/{sid}/objects/{oid}", web::delete().to(remove_object))
        .route("/{sid}/objects/{oid}/duplicate", web::post().to(duplicate_object))
        .route(
            "/{sid}/objects/{oid}/reference-image",
            web::put().to(attach_reference_image),
        )
        .route(
            "/{sid}/objects/{oid}/reference-image",
            web::delete().to(clear_reference_image),
        )
        .route("/{sid}/reset", web::post().to(reset_prompt))
        .route("/{sid}/prompt", web::put().to(load_prompt))
        .route("/{sid}/import", web::post().to(import_prompt))
        .route("/{sid}/export", web::get().to(export_prompt))
        .route("/{sid}/flatten", web::get().to(flatten_prompt))
        .route("/{sid}/generate", web::post().to(generate_from_session))
}

fn prompt_response(prompt: ImagePrompt) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "prompt": prompt
    }))
}

fn object_response(id: String, prompt: ImagePrompt) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "id": id,
        "prompt": prompt
    }))
}

fn found(matched: bool, id: &str) -> Result<(), PaintError> {
    if matched {
        Ok(())
    } else {
        Err(PaintError::ObjectNotFound(id.to_string()))
    }
}

pub async fn create_session(data: web::Data<AppState>) -> HttpResponse {
    let (id, prompt) = data.sessions.create().await;
    HttpResponse::Ok().json(json!({
        "success": true,
        "sessionId": id,
        "prompt": prompt
    }))
}

pub async fn list_sessions(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "sessions": data.sessions.list().await
    }))
}

pub async fn get_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let prompt = data.sessions.get(path.into_inner()).await?;
    Ok(prompt_response(prompt))
}

pub async fn delete_session(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    data.sessions.remove(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub async fn update_meta(
    path: web::Path<Uuid>,
    body: web::Json<MetaPatch>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let patch = body.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| {
            store.update_meta(patch);
            Ok(())
        })
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn update_global_context(
    path: web::Path<Uuid>,
    body: web::Json<GlobalContextPatch>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let patch = body.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| {
            store.update_global_context(patch);
            Ok(())
        })
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn update_lighting(
    path: web::Path<Uuid>,
    body: web::Json<LightingPatch>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let patch = body.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| {
            store.update_lighting(patch);
            Ok(())
        })
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn update_color_palette(
    path: web::Path<Uuid>,
    body: web::Json<ColorPalettePatch>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let patch = body.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| {
            store.update_color_palette(patch);
            Ok(())
        })
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn update_composition(
    path: web::Path<Uuid>,
    body: web::Json<CompositionPatch>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let patch = body.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| {
            store.update_composition(patch);
            Ok(())
        })
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn add_object(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (id, prompt) = data
        .sessions
        .edit(path.into_inner(), |store| Ok(store.add_object()))
        .await?;
    Ok(object_response(id, prompt))
}

pub async fn update_object(
    path: web::Path<(Uuid, String)>,
    body: web::Json<PromptObjectPatch>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (sid, oid) = path.into_inner();
    let patch = body.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(sid, |store| found(store.update_object(&oid, patch), &oid))
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn remove_object(
    path: web::Path<(Uuid, String)>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (sid, oid) = path.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(sid, |store| found(store.remove_object(&oid), &oid))
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn duplicate_object(
    path: web::Path<(Uuid, String)>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (sid, oid) = path.into_inner();
    let (id, prompt) = data
        .sessions
        .edit(sid, |store| {
            store
                .duplicate_object(&oid)
                .ok_or_else(|| PaintError::ObjectNotFound(oid.clone()))
        })
        .await?;
    Ok(object_response(id, prompt))
}

pub async fn reorder_objects(
    path: web::Path<Uuid>,
    body: web::Json<ReorderRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let request = body.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| {
            store.reorder_objects(request.from_index, request.to_index)
        })
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn attach_reference_image(
    path: web::Path<(Uuid, String)>,
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (sid, oid) = path.into_inner();
    let upload = read_first_file(payload).await?;
    let reference = data
        .image_processor
        .to_reference_image(&upload.data, &upload.filename)?;

    let ((), prompt) = data
        .sessions
        .edit(sid, |store| found(store.set_reference_image(&oid, reference), &oid))
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn clear_reference_image(
    path: web::Path<(Uuid, String)>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (sid, oid) = path.into_inner();
    let ((), prompt) = data
        .sessions
        .edit(sid, |store| found(store.clear_reference_image(&oid), &oid))
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn reset_prompt(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| {
            store.reset_prompt();
            Ok(())
        })
        .await?;
    Ok(prompt_response(prompt))
}

/// Replaces the document with raw JSON text from the request body.
pub async fn load_prompt(
    path: web::Path<Uuid>,
    body: web::Bytes,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let text = utf8_body(&body)?;
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| store.import_json(text))
        .await?;
    Ok(prompt_response(prompt))
}

/// Replaces the document with an uploaded JSON file.
pub async fn import_prompt(
    path: web::Path<Uuid>,
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let upload = read_first_file(payload).await?;
    let text = utf8_body(&upload.data)?;
    let ((), prompt) = data
        .sessions
        .edit(path.into_inner(), |store| store.import_json(text))
        .await?;
    Ok(prompt_response(prompt))
}

pub async fn export_prompt(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let json = data
        .sessions
        .read(path.into_inner(), |store| store.export_json())
        .await??;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(("Content-Disposition", "attachment; filename=\"prompt.json\""))
        .body(json))
}

pub async fn flatten_prompt(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let text = data
        .sessions
        .read(path.into_inner(), |store| prompt::flatten(store.prompt()))
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "prompt": text
    })))
}

pub async fn generate_from_session(
    path: web::Path<Uuid>,
    body: Option<web::Json<GenerateOptions>>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let options = body.map(web::Json::into_inner).unwrap_or_default();
    let prompt = data.sessions.get(path.into_inner()).await?;
    let format = options.format.unwrap_or(data.prompt_format);

    let response = super::generation::run_generation(&data, &prompt, format).await?;
    Ok(HttpResponse::Ok().json(response))
}
