/// Aggregation service - composes the stores into profile summaries and the
/// reverse-chronological home stream.
use std::sync::Arc;

use crate::domain::{Photo, Profile};
use crate::error::Result;
use crate::repository::traits::{GraphStore, PhotoStore, UserStore};

#[derive(Clone)]
pub struct AggregationService {
    users: Arc<dyn UserStore>,
    graph: Arc<dyn GraphStore>,
    photos: Arc<dyn PhotoStore>,
}

impl AggregationService {
    pub fn new(
        users: Arc<dyn UserStore>,
        graph: Arc<dyn GraphStore>,
        photos: Arc<dyn PhotoStore>,
    ) -> Self {
        Self {
            users,
            graph,
            photos,
        }
    }

    /// Profile summary for a user, looked up by username.
    ///
    /// Any failing sub-count aborts the aggregate with that error; there are
    /// no best-effort defaults.
    pub async fn profile(&self, username: &str) -> Result<Profile> {
        let user = self.users.by_username(username).await?;

        let photo_count = self.photos.count_by_owner(user.user_id).await?;
        let followers_count = self.graph.followers_count(user.user_id).await?;
        let following_count = self.graph.following_count(user.user_id).await?;
        let banned_count = self.graph.banned_count(user.user_id).await?;

        Ok(Profile {
            user_id: user.user_id,
            username: user.username,
            photo_count,
            followers_count,
            following_count,
            banned_count,
        })
    }

    /// Home stream: all photos of every followed user, merged and sorted by
    /// upload time descending.
    ///
    /// The per-owner lists are already sorted, but the result is defined as
    /// a full re-sort of the concatenation; ties on upload time fall back to
    /// id descending so the order stays total.
    pub async fn home_stream(&self, user_id: i64) -> Result<Vec<Photo>> {
        let following = self.graph.following(user_id).await?;

        let mut stream = Vec::new();
        for followed in &following {
            stream.extend(self.photos.list_by_owner(followed.user_id).await?);
        }

        stream.sort_by(|a, b| {
            b.upload_time
                .cmp(&a.upload_time)
                .then(b.photo_id.cmp(&a.photo_id))
        });

        Ok(stream)
    }
}
