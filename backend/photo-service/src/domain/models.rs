use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - identified by an immutable id, displayed by a mutable,
/// unique username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
}

/// Public profile summary composed from the user's photo, follower,
/// following and ban counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    pub username: String,
    pub photo_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub banned_count: i64,
}

/// Photo entity with denormalized engagement counters.
///
/// `like_count` and `comments_count` must always equal the cardinality of
/// the matching likes/comments relations; every mutation of those relations
/// updates the counter in the same transaction.
///
/// The raw image is never serialized into JSON listings; it is served by a
/// dedicated image endpoint with the stored mime type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Photo {
    pub photo_id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    #[serde(skip_serializing, default)]
    pub image: Vec<u8>,
    pub mime_type: String,
    pub caption: String,
    pub upload_time: DateTime<Utc>,
    pub like_count: i64,
    pub comments_count: i64,
}

/// Comment entity - belongs to exactly one photo and one author
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub comment_id: i64,
    pub photo_id: i64,
    pub owner_id: i64,
    pub owner_username: String,
    pub content: String,
}
