/// Photo handlers - upload, delete, metadata, image bytes
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::Identity;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub caption: Option<String>,
}

/// Upload a photo: raw body bytes, mime from the Content-Type header,
/// caption from the query string
pub async fn upload_photo(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<UploadQuery>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    if body.is_empty() {
        return Err(AppError::InvalidInput("image payload is empty".to_string()));
    }

    let mime_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let caption = query.caption.clone().unwrap_or_default();

    let photo = state
        .photos
        .upload(identity.0, body.to_vec(), &mime_type, &caption)
        .await?;

    Ok(HttpResponse::Created().json(photo))
}

pub async fn delete_photo(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse> {
    let (_, photo_id) = path.into_inner();
    state.photos.delete(photo_id, identity.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Photo metadata as JSON (no image bytes)
pub async fn get_photo(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let photo = state.photos.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(photo))
}

/// Raw image bytes with the stored mime type
pub async fn get_photo_image(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let photo = state.photos.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type(photo.mime_type)
        .body(photo.image))
}

/// A user's photos, newest first
pub async fn list_photos(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = state.users.by_username(&path.into_inner()).await?;
    let photos = state.photos.list_by_owner(user.user_id).await?;
    Ok(HttpResponse::Ok().json(photos))
}
