/// Like handlers
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::handlers::AppState;
use crate::middleware::Identity;

pub async fn like_photo(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    state.engagement.like(identity.0, path.into_inner()).await?;
    Ok(HttpResponse::Created().finish())
}

pub async fn unlike_photo(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    state
        .engagement
        .unlike(identity.0, path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Ids of the users that liked a photo
pub async fn list_likers(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse> {
    let likers = state.engagement.likers(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(likers))
}

/// Whether the caller has liked the photo
pub async fn like_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let has_liked = state
        .engagement
        .has_liked(identity.0, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "has_liked": has_liked })))
}
