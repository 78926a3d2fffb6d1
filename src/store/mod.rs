// src/store/mod.rs

pub mod memory;

use async_trait::async_trait;
use std::fmt;

use crate::models::{
    achievement::Achievement,
    challenge::Challenge,
    comment::Comment,
    user::{Role, User},
    video::{Video, VideoStatus},
};

pub use memory::MemStore;

/// Points awarded for uploading a video.
pub const POINTS_UPLOAD: i32 = 10;
/// Points awarded to the video owner per like received.
pub const POINTS_LIKE_RECEIVED: i32 = 1;
/// Points awarded for posting a comment.
pub const POINTS_COMMENT: i32 = 1;
/// Bonus points awarded to the uploader when a video is approved.
pub const POINTS_APPROVAL: i32 = 20;

/// Errors surfaced by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested username is already taken.
    UsernameTaken(String),
    /// A referenced entity does not exist. Carries the entity kind for the
    /// error message ("User", "Video", ...).
    NotFound(&'static str),
    /// The video has already left the `pending` state. Review transitions are
    /// one-shot: repeating an approval must never re-award points.
    AlreadyReviewed,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UsernameTaken(username) => {
                write!(f, "username '{}' already exists", username)
            }
            StoreError::NotFound(what) => write!(f, "{} not found", what),
            StoreError::AlreadyReviewed => write!(f, "video has already been reviewed"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Insert payload for a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub role: Role,
}

/// Insert payload for a video.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub topic: String,
}

/// Insert payload for a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub video_id: i64,
    pub user_id: i64,
    pub content: String,
}

/// Insert payload for a challenge.
#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub title: String,
    pub description: String,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
    pub topic: String,
    pub is_active: bool,
}

/// Insert payload for an achievement.
#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub user_id: i64,
    pub r#type: String,
}

/// Typed storage operations for the five entity kinds plus the saved-video
/// join. Handlers go through this trait only; the engine behind it is
/// swappable (in-memory today, a relational store later).
///
/// Every read-modify-write (counter increments, point awards, status
/// transitions) is atomic inside the engine. Callers never get-then-set.
#[async_trait]
pub trait Storage: Send + Sync {
    // User operations

    /// Creates a user. Fails with `UsernameTaken` when the username exists;
    /// the check and the insert happen under one lock.
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;
    async fn get_user(&self, id: i64) -> Option<User>;
    async fn get_user_by_username(&self, username: &str) -> Option<User>;
    /// Top users by points, descending. Ties break by lower id first.
    async fn get_top_users(&self, limit: usize) -> Vec<User>;
    /// Atomically adds `delta` to the user's points and returns the updated
    /// user, or `None` when the user does not exist.
    async fn add_user_points(&self, user_id: i64, delta: i32) -> Option<User>;

    // Video operations

    async fn create_video(&self, new: NewVideo) -> Video;
    async fn get_video(&self, id: i64) -> Option<Video>;
    async fn get_videos_by_user(&self, user_id: i64) -> Vec<Video>;
    /// Approved videos, newest first, sliced by offset/limit.
    async fn get_approved_videos(&self, limit: usize, offset: usize) -> Vec<Video>;
    /// Approved videos matching `topic`, newest first, sliced by offset/limit.
    async fn get_videos_by_topic(&self, topic: &str, limit: usize, offset: usize) -> Vec<Video>;
    /// Pending videos, newest first, capped at `limit`.
    async fn get_pending_videos(&self, limit: usize) -> Vec<Video>;
    /// One-shot moderation transition: `pending -> approved | rejected`.
    /// Returns `AlreadyReviewed` when the video is no longer pending.
    async fn review_video(&self, id: i64, status: VideoStatus) -> Result<Video, StoreError>;
    /// Atomically increments the like counter. Returns the updated video.
    async fn like_video(&self, id: i64) -> Option<Video>;
    /// Atomically increments the view counter. Returns the updated video.
    async fn view_video(&self, id: i64) -> Option<Video>;

    // Comment operations

    /// Creates a comment and increments the parent video's comment counter in
    /// the same critical section. Fails when the video does not exist.
    async fn create_comment(&self, new: NewComment) -> Result<Comment, StoreError>;
    /// Comments for a video, newest first.
    async fn get_comments_by_video(&self, video_id: i64) -> Vec<Comment>;

    // Challenge operations

    async fn create_challenge(&self, new: NewChallenge) -> Challenge;
    /// The active challenge: `is_active` AND now within [start, end].
    /// When several qualify, the most recently created one (highest id) wins.
    async fn get_active_challenge(&self) -> Option<Challenge>;
    async fn get_all_challenges(&self) -> Vec<Challenge>;

    // Achievement operations

    /// Records an achievement. Fails when the user does not exist.
    async fn create_achievement(&self, new: NewAchievement) -> Result<Achievement, StoreError>;
    async fn get_achievements_by_user(&self, user_id: i64) -> Vec<Achievement>;

    // Saved-video operations

    /// Saves a video for a user. Idempotent; returns false when the pair was
    /// already saved.
    async fn save_video(&self, user_id: i64, video_id: i64) -> bool;
    /// Removes a saved-video record. Returns whether a record existed.
    async fn unsave_video(&self, user_id: i64, video_id: i64) -> bool;
    /// Videos the user has saved, sorted by video creation time descending.
    async fn get_saved_videos(&self, user_id: i64) -> Vec<Video>;
    async fn is_video_saved(&self, user_id: i64, video_id: i64) -> bool;
}
