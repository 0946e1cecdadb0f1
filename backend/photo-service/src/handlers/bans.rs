/// Ban edge handlers
///
/// Banning cascades inside the store: it breaks the follow relationship in
/// both directions and removes the target's engagement on the requester's
/// photos, atomically.
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::Identity;

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub username: String,
}

pub async fn ban_user(
    state: web::Data<AppState>,
    identity: Identity,
    req: web::Json<BanRequest>,
) -> Result<HttpResponse> {
    let target = state.users.by_username(&req.username).await?;

    if target.user_id == identity.0 {
        return Err(AppError::InvalidInput("cannot ban yourself".to_string()));
    }

    state.graph.ban(identity.0, target.user_id).await?;
    Ok(HttpResponse::Ok().json(target))
}

pub async fn unban_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (_, target_username) = path.into_inner();
    let target = state.users.by_username(&target_username).await?;

    state.graph.unban(identity.0, target.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_bans(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = state.users.by_username(&path.into_inner()).await?;
    let banned = state.graph.banned(user.user_id).await?;
    Ok(HttpResponse::Ok().json(banned))
}

pub async fn ban_status(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (username, target_username) = path.into_inner();
    let user = state.users.by_username(&username).await?;
    let target = state.users.by_username(&target_username).await?;

    let is_banned = state.graph.is_banned(user.user_id, target.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "is_banned": is_banned })))
}
