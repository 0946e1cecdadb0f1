/// Follow edge handlers
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::Identity;

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub username: String,
}

/// Follow the user named in the request body
pub async fn follow_user(
    state: web::Data<AppState>,
    identity: Identity,
    req: web::Json<FollowRequest>,
) -> Result<HttpResponse> {
    let target = state.users.by_username(&req.username).await?;

    if target.user_id == identity.0 {
        return Err(AppError::InvalidInput(
            "cannot follow yourself".to_string(),
        ));
    }

    state.graph.follow(identity.0, target.user_id).await?;
    Ok(HttpResponse::Ok().json(target))
}

pub async fn unfollow_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (_, target_username) = path.into_inner();
    let target = state.users.by_username(&target_username).await?;

    state.graph.unfollow(identity.0, target.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_followers(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = state.users.by_username(&path.into_inner()).await?;
    let followers = state.graph.followers(user.user_id).await?;
    Ok(HttpResponse::Ok().json(followers))
}

pub async fn list_following(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = state.users.by_username(&path.into_inner()).await?;
    let following = state.graph.following(user.user_id).await?;
    Ok(HttpResponse::Ok().json(following))
}

/// Whether the user in the path follows the target in the path
pub async fn follow_status(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (username, target_username) = path.into_inner();
    let user = state.users.by_username(&username).await?;
    let target = state.users.by_username(&target_username).await?;

    let is_following = state.graph.is_following(user.user_id, target.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "is_following": is_following })))
}
