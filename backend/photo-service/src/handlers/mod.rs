/// HTTP handlers for photo-service
///
/// Thin boundary over the stores and the aggregation service; identity is
/// extracted from the bearer header, error kinds map to status codes in
/// `error.rs`.
pub mod bans;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod photos;
pub mod stream;
pub mod users;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::repository::traits::{EngagementStore, GraphStore, PhotoStore, UserStore};
use crate::services::AggregationService;

/// Shared application state: store trait objects plus the aggregation
/// service composed over them.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub graph: Arc<dyn GraphStore>,
    pub photos: Arc<dyn PhotoStore>,
    pub engagement: Arc<dyn EngagementStore>,
    pub aggregation: AggregationService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        graph: Arc<dyn GraphStore>,
        photos: Arc<dyn PhotoStore>,
        engagement: Arc<dyn EngagementStore>,
    ) -> Self {
        let aggregation =
            AggregationService::new(users.clone(), graph.clone(), photos.clone());

        Self {
            users,
            graph,
            photos,
            engagement,
            aggregation,
        }
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Route table
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        // User directory
        .route("/session", web::post().to(users::create_session))
        .route("/users", web::get().to(users::list_users))
        .route("/users/{username}", web::put().to(users::rename_user))
        .route("/users/{username}/profile", web::get().to(users::get_profile))
        // Home stream
        .route("/stream", web::get().to(stream::get_stream))
        // Photos
        .route("/users/{username}/photos", web::get().to(photos::list_photos))
        .route("/users/{username}/photos", web::post().to(photos::upload_photo))
        .route(
            "/users/{username}/photos/{photo_id}",
            web::delete().to(photos::delete_photo),
        )
        .route("/photos/{photo_id}", web::get().to(photos::get_photo))
        .route("/photos/{photo_id}/image", web::get().to(photos::get_photo_image))
        // Follow edges
        .route(
            "/users/{username}/followers",
            web::get().to(follows::list_followers),
        )
        .route(
            "/users/{username}/followers",
            web::post().to(follows::follow_user),
        )
        .route(
            "/users/{username}/followers/{target}",
            web::get().to(follows::follow_status),
        )
        .route(
            "/users/{username}/followers/{target}",
            web::delete().to(follows::unfollow_user),
        )
        .route(
            "/users/{username}/following",
            web::get().to(follows::list_following),
        )
        // Ban edges
        .route("/users/{username}/bans", web::get().to(bans::list_bans))
        .route("/users/{username}/bans", web::post().to(bans::ban_user))
        .route(
            "/users/{username}/bans/{target}",
            web::get().to(bans::ban_status),
        )
        .route(
            "/users/{username}/bans/{target}",
            web::delete().to(bans::unban_user),
        )
        // Likes
        .route("/photos/{photo_id}/likes", web::get().to(likes::list_likers))
        .route("/photos/{photo_id}/likes", web::post().to(likes::like_photo))
        .route(
            "/photos/{photo_id}/likes",
            web::delete().to(likes::unlike_photo),
        )
        .route("/photos/{photo_id}/liked", web::get().to(likes::like_status))
        // Comments
        .route(
            "/photos/{photo_id}/comments",
            web::get().to(comments::list_comments),
        )
        .route(
            "/photos/{photo_id}/comments",
            web::post().to(comments::comment_photo),
        )
        .route(
            "/photos/{photo_id}/comments/{comment_id}",
            web::delete().to(comments::uncomment_photo),
        );
}
