/// Comment handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::Identity;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

pub async fn comment_photo(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    if req.content.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "comment content must not be empty".to_string(),
        ));
    }

    let comment = state
        .engagement
        .comment(path.into_inner(), identity.0, &req.content)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

pub async fn uncomment_photo(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse> {
    let (photo_id, comment_id) = path.into_inner();
    state
        .engagement
        .uncomment(photo_id, comment_id, identity.0)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Comments of a photo in insertion order
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let comments = state.engagement.comments_of(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}
