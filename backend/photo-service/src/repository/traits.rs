/// Store traits decoupling the aggregation/HTTP layers from PostgreSQL.
///
/// The Postgres repositories in this module's siblings implement these
/// traits; tests inject mocks or an in-memory store honoring the same
/// contract.
use async_trait::async_trait;

use crate::domain::{Comment, Photo, User};
use crate::error::Result;

/// User directory: create/lookup users, enforce username uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Return the existing user with `username`, or create one. Idempotent
    /// under concurrent calls with the same username.
    async fn get_or_create(&self, username: &str) -> Result<User>;

    async fn by_username(&self, username: &str) -> Result<User>;

    async fn by_id(&self, user_id: i64) -> Result<User>;

    /// Change a user's username. `Conflict` when the name is taken,
    /// `NotFound` when the user id is absent.
    async fn rename(&self, user_id: i64, new_username: &str) -> Result<User>;

    /// Page through all users, ordered by id ascending. `page` starts at 1.
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<User>>;
}

/// Follow and ban edges, with list/count queries over them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Insert a follow edge. A duplicate edge is surfaced as `Conflict`.
    async fn follow(&self, follower_id: i64, following_id: i64) -> Result<()>;

    /// Delete a follow edge. `NotFound` when the edge did not exist.
    async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<()>;

    async fn followers(&self, user_id: i64) -> Result<Vec<User>>;

    async fn following(&self, user_id: i64) -> Result<Vec<User>>;

    async fn followers_count(&self, user_id: i64) -> Result<i64>;

    async fn following_count(&self, user_id: i64) -> Result<i64>;

    async fn is_following(&self, follower_id: i64, following_id: i64) -> Result<bool>;

    /// Ban `target_id` and atomically remove the follow edges in both
    /// directions plus all of the target's comments and likes on the
    /// requester's photos (with counter decrements). Never partially
    /// applied.
    async fn ban(&self, user_id: i64, target_id: i64) -> Result<()>;

    /// Remove the ban edge only; deleted follows/engagement stay deleted.
    async fn unban(&self, user_id: i64, target_id: i64) -> Result<()>;

    async fn is_banned(&self, user_id: i64, target_id: i64) -> Result<bool>;

    async fn banned(&self, user_id: i64) -> Result<Vec<User>>;

    async fn banned_count(&self, user_id: i64) -> Result<i64>;
}

/// Photo posts and their denormalized counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn upload(
        &self,
        owner_id: i64,
        image: Vec<u8>,
        mime_type: &str,
        caption: &str,
    ) -> Result<Photo>;

    /// Delete a photo with its comments and likes. `Forbidden` unless the
    /// requester is the owner.
    async fn delete(&self, photo_id: i64, requester_id: i64) -> Result<()>;

    async fn get(&self, photo_id: i64) -> Result<Photo>;

    /// All photos of one owner, newest first (ties broken by id descending).
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Photo>>;

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64>;
}

/// Likes and comments, maintained together with the photo counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementStore: Send + Sync {
    /// Insert a like and increment the photo's like count in one
    /// transaction. `Conflict` when the photo is already liked.
    async fn like(&self, user_id: i64, photo_id: i64) -> Result<()>;

    /// Delete a like and decrement the like count. `NotFound` when the like
    /// did not exist; the counter is never corrupted by a failed unlike.
    async fn unlike(&self, user_id: i64, photo_id: i64) -> Result<()>;

    async fn has_liked(&self, user_id: i64, photo_id: i64) -> Result<bool>;

    async fn likers(&self, photo_id: i64) -> Result<Vec<i64>>;

    async fn comment(&self, photo_id: i64, owner_id: i64, content: &str) -> Result<Comment>;

    /// Delete a comment only when `(comment_id, owner_id, photo_id)` all
    /// match; decrements the comments count.
    async fn uncomment(&self, photo_id: i64, comment_id: i64, owner_id: i64) -> Result<()>;

    /// Comments of a photo in insertion order.
    async fn comments_of(&self, photo_id: i64) -> Result<Vec<Comment>>;
}
