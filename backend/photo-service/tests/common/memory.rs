//! In-memory store used by the integration tests.
//!
//! Implements the same contract as the Postgres repositories: precise error
//! kinds, counter maintenance in step with the owning insert/delete, and the
//! ban cascade applied as one atomic unit (a single lock here standing in
//! for the database transaction).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use photo_service::domain::{Comment, Photo, User};
use photo_service::error::{AppError, Result};
use photo_service::repository::traits::{EngagementStore, GraphStore, PhotoStore, UserStore};

#[derive(Debug, Clone)]
struct StoredPhoto {
    photo_id: i64,
    owner_id: i64,
    image: Vec<u8>,
    mime_type: String,
    caption: String,
    upload_time: DateTime<Utc>,
    like_count: i64,
    comments_count: i64,
}

#[derive(Debug, Clone)]
struct StoredComment {
    comment_id: i64,
    owner_id: i64,
    photo_id: i64,
    content: String,
}

#[derive(Default)]
struct State {
    next_user_id: i64,
    next_photo_id: i64,
    next_comment_id: i64,
    users: BTreeMap<i64, String>,
    photos: BTreeMap<i64, StoredPhoto>,
    /// (user_id, photo_id)
    likes: BTreeSet<(i64, i64)>,
    comments: BTreeMap<i64, StoredComment>,
    /// (follower_id, following_id)
    follows: BTreeSet<(i64, i64)>,
    /// (user_id, banned_user_id)
    bans: BTreeSet<(i64, i64)>,
}

impl State {
    fn user(&self, user_id: i64) -> Result<User> {
        self.users
            .get(&user_id)
            .map(|username| User {
                user_id,
                username: username.clone(),
            })
            .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", user_id)))
    }

    fn photo_model(&self, stored: &StoredPhoto) -> Photo {
        Photo {
            photo_id: stored.photo_id,
            owner_id: stored.owner_id,
            owner_username: self
                .users
                .get(&stored.owner_id)
                .cloned()
                .unwrap_or_default(),
            image: stored.image.clone(),
            mime_type: stored.mime_type.clone(),
            caption: stored.caption.clone(),
            upload_time: stored.upload_time,
            like_count: stored.like_count,
            comments_count: stored.comments_count,
        }
    }

    fn comment_model(&self, stored: &StoredComment) -> Comment {
        Comment {
            comment_id: stored.comment_id,
            photo_id: stored.photo_id,
            owner_id: stored.owner_id,
            owner_username: self
                .users
                .get(&stored.owner_id)
                .cloned()
                .unwrap_or_default(),
            content: stored.content.clone(),
        }
    }
}

pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory store lock poisoned")
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_or_create(&self, username: &str) -> Result<User> {
        let mut state = self.lock();

        if let Some((&user_id, name)) = state.users.iter().find(|(_, name)| *name == username) {
            return Ok(User {
                user_id,
                username: name.clone(),
            });
        }

        state.next_user_id += 1;
        let user_id = state.next_user_id;
        state.users.insert(user_id, username.to_string());

        Ok(User {
            user_id,
            username: username.to_string(),
        })
    }

    async fn by_username(&self, username: &str) -> Result<User> {
        let state = self.lock();
        state
            .users
            .iter()
            .find(|(_, name)| *name == username)
            .map(|(&user_id, name)| User {
                user_id,
                username: name.clone(),
            })
            .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", username)))
    }

    async fn by_id(&self, user_id: i64) -> Result<User> {
        self.lock().user(user_id)
    }

    async fn rename(&self, user_id: i64, new_username: &str) -> Result<User> {
        let mut state = self.lock();

        if !state.users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!(
                "user {} does not exist",
                user_id
            )));
        }

        let taken = state
            .users
            .iter()
            .any(|(&id, name)| id != user_id && name == new_username);
        if taken {
            return Err(AppError::Conflict(format!(
                "username {} is already taken",
                new_username
            )));
        }

        state.users.insert(user_id, new_username.to_string());
        Ok(User {
            user_id,
            username: new_username.to_string(),
        })
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<User>> {
        let state = self.lock();
        let offset = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(page_size))
            .ok_or_else(|| AppError::InvalidInput("page is out of range".to_string()))?
            as usize;

        Ok(state
            .users
            .iter()
            .skip(offset)
            .take(page_size as usize)
            .map(|(&user_id, name)| User {
                user_id,
                username: name.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl GraphStore for MemoryStore {
    async fn follow(&self, follower_id: i64, following_id: i64) -> Result<()> {
        let mut state = self.lock();
        state.user(follower_id)?;
        state.user(following_id)?;

        if !state.follows.insert((follower_id, following_id)) {
            return Err(AppError::Conflict(format!(
                "already following user {}",
                following_id
            )));
        }
        Ok(())
    }

    async fn unfollow(&self, follower_id: i64, following_id: i64) -> Result<()> {
        let mut state = self.lock();
        if !state.follows.remove(&(follower_id, following_id)) {
            return Err(AppError::NotFound(format!(
                "not following user {}",
                following_id
            )));
        }
        Ok(())
    }

    async fn followers(&self, user_id: i64) -> Result<Vec<User>> {
        let state = self.lock();
        Ok(state
            .follows
            .iter()
            .filter(|(_, following)| *following == user_id)
            .filter_map(|(follower, _)| state.user(*follower).ok())
            .collect())
    }

    async fn following(&self, user_id: i64) -> Result<Vec<User>> {
        let state = self.lock();
        Ok(state
            .follows
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .filter_map(|(_, following)| state.user(*following).ok())
            .collect())
    }

    async fn followers_count(&self, user_id: i64) -> Result<i64> {
        let state = self.lock();
        Ok(state
            .follows
            .iter()
            .filter(|(_, following)| *following == user_id)
            .count() as i64)
    }

    async fn following_count(&self, user_id: i64) -> Result<i64> {
        let state = self.lock();
        Ok(state
            .follows
            .iter()
            .filter(|(follower, _)| *follower == user_id)
            .count() as i64)
    }

    async fn is_following(&self, follower_id: i64, following_id: i64) -> Result<bool> {
        Ok(self.lock().follows.contains(&(follower_id, following_id)))
    }

    async fn ban(&self, user_id: i64, target_id: i64) -> Result<()> {
        // Whole cascade under one lock, mirroring the single transaction
        let mut state = self.lock();
        state.user(user_id)?;
        state.user(target_id)?;

        if !state.bans.insert((user_id, target_id)) {
            return Err(AppError::Conflict(format!(
                "user {} is already banned",
                target_id
            )));
        }

        state.follows.remove(&(user_id, target_id));
        state.follows.remove(&(target_id, user_id));

        let removed_comments: Vec<i64> = state
            .comments
            .values()
            .filter(|c| {
                c.owner_id == target_id
                    && state
                        .photos
                        .get(&c.photo_id)
                        .map(|p| p.owner_id == user_id)
                        .unwrap_or(false)
            })
            .map(|c| c.comment_id)
            .collect();
        for comment_id in removed_comments {
            let photo_id = state.comments.remove(&comment_id).map(|c| c.photo_id);
            if let Some(photo_id) = photo_id {
                if let Some(photo) = state.photos.get_mut(&photo_id) {
                    photo.comments_count -= 1;
                }
            }
        }

        let removed_likes: Vec<(i64, i64)> = state
            .likes
            .iter()
            .filter(|(liker, photo_id)| {
                *liker == target_id
                    && state
                        .photos
                        .get(photo_id)
                        .map(|p| p.owner_id == user_id)
                        .unwrap_or(false)
            })
            .copied()
            .collect();
        for key in removed_likes {
            state.likes.remove(&key);
            if let Some(photo) = state.photos.get_mut(&key.1) {
                photo.like_count -= 1;
            }
        }

        Ok(())
    }

    async fn unban(&self, user_id: i64, target_id: i64) -> Result<()> {
        let mut state = self.lock();
        if !state.bans.remove(&(user_id, target_id)) {
            return Err(AppError::NotFound(format!(
                "user {} is not in the ban list",
                target_id
            )));
        }
        Ok(())
    }

    async fn is_banned(&self, user_id: i64, target_id: i64) -> Result<bool> {
        Ok(self.lock().bans.contains(&(user_id, target_id)))
    }

    async fn banned(&self, user_id: i64) -> Result<Vec<User>> {
        let state = self.lock();
        Ok(state
            .bans
            .iter()
            .filter(|(banner, _)| *banner == user_id)
            .filter_map(|(_, banned)| state.user(*banned).ok())
            .collect())
    }

    async fn banned_count(&self, user_id: i64) -> Result<i64> {
        let state = self.lock();
        Ok(state
            .bans
            .iter()
            .filter(|(banner, _)| *banner == user_id)
            .count() as i64)
    }
}

#[async_trait]
impl PhotoStore for MemoryStore {
    async fn upload(
        &self,
        owner_id: i64,
        image: Vec<u8>,
        mime_type: &str,
        caption: &str,
    ) -> Result<Photo> {
        let mut state = self.lock();
        state.user(owner_id)?;

        state.next_photo_id += 1;
        let stored = StoredPhoto {
            photo_id: state.next_photo_id,
            owner_id,
            image,
            mime_type: mime_type.to_string(),
            caption: caption.to_string(),
            upload_time: Utc::now(),
            like_count: 0,
            comments_count: 0,
        };
        let photo = state.photo_model(&stored);
        state.photos.insert(stored.photo_id, stored);
        Ok(photo)
    }

    async fn delete(&self, photo_id: i64, requester_id: i64) -> Result<()> {
        let mut state = self.lock();

        let owner_id = state
            .photos
            .get(&photo_id)
            .map(|p| p.owner_id)
            .ok_or_else(|| AppError::NotFound(format!("photo {} does not exist", photo_id)))?;

        if owner_id != requester_id {
            return Err(AppError::Forbidden(
                "only the owner can delete a photo".to_string(),
            ));
        }

        state.comments.retain(|_, c| c.photo_id != photo_id);
        state.likes.retain(|(_, liked)| *liked != photo_id);
        state.photos.remove(&photo_id);
        Ok(())
    }

    async fn get(&self, photo_id: i64) -> Result<Photo> {
        let state = self.lock();
        state
            .photos
            .get(&photo_id)
            .map(|p| state.photo_model(p))
            .ok_or_else(|| AppError::NotFound(format!("photo {} does not exist", photo_id)))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Photo>> {
        let state = self.lock();
        let mut photos: Vec<Photo> = state
            .photos
            .values()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| state.photo_model(p))
            .collect();

        photos.sort_by(|a, b| {
            b.upload_time
                .cmp(&a.upload_time)
                .then(b.photo_id.cmp(&a.photo_id))
        });
        Ok(photos)
    }

    async fn count_by_owner(&self, owner_id: i64) -> Result<i64> {
        let state = self.lock();
        Ok(state
            .photos
            .values()
            .filter(|p| p.owner_id == owner_id)
            .count() as i64)
    }
}

#[async_trait]
impl EngagementStore for MemoryStore {
    async fn like(&self, user_id: i64, photo_id: i64) -> Result<()> {
        let mut state = self.lock();
        state.user(user_id)?;

        if !state.photos.contains_key(&photo_id) {
            return Err(AppError::NotFound(format!(
                "photo {} does not exist",
                photo_id
            )));
        }

        if !state.likes.insert((user_id, photo_id)) {
            return Err(AppError::Conflict(format!(
                "photo {} is already liked",
                photo_id
            )));
        }

        if let Some(photo) = state.photos.get_mut(&photo_id) {
            photo.like_count += 1;
        }
        Ok(())
    }

    async fn unlike(&self, user_id: i64, photo_id: i64) -> Result<()> {
        let mut state = self.lock();

        if !state.likes.remove(&(user_id, photo_id)) {
            return Err(AppError::NotFound(format!(
                "photo {} is not liked",
                photo_id
            )));
        }

        if let Some(photo) = state.photos.get_mut(&photo_id) {
            photo.like_count -= 1;
        }
        Ok(())
    }

    async fn has_liked(&self, user_id: i64, photo_id: i64) -> Result<bool> {
        Ok(self.lock().likes.contains(&(user_id, photo_id)))
    }

    async fn likers(&self, photo_id: i64) -> Result<Vec<i64>> {
        let state = self.lock();
        Ok(state
            .likes
            .iter()
            .filter(|(_, liked)| *liked == photo_id)
            .map(|(liker, _)| *liker)
            .collect())
    }

    async fn comment(&self, photo_id: i64, owner_id: i64, content: &str) -> Result<Comment> {
        let mut state = self.lock();
        state.user(owner_id)?;

        if !state.photos.contains_key(&photo_id) {
            return Err(AppError::NotFound(format!(
                "photo {} does not exist",
                photo_id
            )));
        }

        state.next_comment_id += 1;
        let stored = StoredComment {
            comment_id: state.next_comment_id,
            owner_id,
            photo_id,
            content: content.to_string(),
        };
        let comment = state.comment_model(&stored);
        state.comments.insert(stored.comment_id, stored);

        if let Some(photo) = state.photos.get_mut(&photo_id) {
            photo.comments_count += 1;
        }
        Ok(comment)
    }

    async fn uncomment(&self, photo_id: i64, comment_id: i64, owner_id: i64) -> Result<()> {
        let mut state = self.lock();

        let matches = state
            .comments
            .get(&comment_id)
            .map(|c| c.photo_id == photo_id && c.owner_id == owner_id)
            .unwrap_or(false);
        if !matches {
            return Err(AppError::NotFound(format!(
                "comment {} does not exist on photo {}",
                comment_id, photo_id
            )));
        }

        state.comments.remove(&comment_id);
        if let Some(photo) = state.photos.get_mut(&photo_id) {
            photo.comments_count -= 1;
        }
        Ok(())
    }

    async fn comments_of(&self, photo_id: i64) -> Result<Vec<Comment>> {
        let state = self.lock();
        Ok(state
            .comments
            .values()
            .filter(|c| c.photo_id == photo_id)
            .map(|c| state.comment_model(c))
            .collect())
    }
}
