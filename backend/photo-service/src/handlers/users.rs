/// User directory handlers - session login, listing, rename, profile
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::handlers::AppState;
use crate::middleware::Identity;

#[derive(Debug, Deserialize)]
pub struct SessionRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub username: String,
}

/// Log in by username, creating the user on first login
pub async fn create_session(
    state: web::Data<AppState>,
    req: web::Json<SessionRequest>,
) -> Result<HttpResponse> {
    let user = state.users.get_or_create(&req.username).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Paginated user listing, ordered by id ascending
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(50);

    if page < 1 {
        return Err(AppError::InvalidInput("page must be >= 1".to_string()));
    }
    if !(1..=100).contains(&page_size) {
        return Err(AppError::InvalidInput(
            "page_size must be between 1 and 100".to_string(),
        ));
    }
    // The offset must stay representable; a page number large enough to
    // overflow it cannot address any row
    if page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(page_size))
        .is_none()
    {
        return Err(AppError::InvalidInput("page is out of range".to_string()));
    }

    let users = state.users.list(page, page_size).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Rename the authenticated user
pub async fn rename_user(
    state: web::Data<AppState>,
    identity: Identity,
    req: web::Json<RenameRequest>,
) -> Result<HttpResponse> {
    let user = state.users.rename(identity.0, &req.username).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Public profile with photo/follower/following/ban counts
pub async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let profile = state.aggregation.profile(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}
