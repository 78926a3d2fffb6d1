// src/store/memory.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::{
    achievement::Achievement,
    challenge::Challenge,
    comment::Comment,
    user::User,
    video::{Video, VideoStatus},
};

use super::{
    NewAchievement, NewChallenge, NewComment, NewUser, NewVideo, Storage, StoreError,
};

/// In-memory storage engine.
///
/// One `RwLock`-guarded table per entity kind plus a composite-key table for
/// saves. Mutations take the write lock and modify records in place, so every
/// read-modify-write (counters, points, status) is a single critical section;
/// concurrent increments cannot lose updates. When two tables are touched at
/// once (comments + parent video), locks are always taken in table order:
/// videos before comments.
pub struct MemStore {
    users: RwLock<HashMap<i64, User>>,
    videos: RwLock<HashMap<i64, Video>>,
    comments: RwLock<HashMap<i64, Comment>>,
    challenges: RwLock<HashMap<i64, Challenge>>,
    achievements: RwLock<HashMap<i64, Achievement>>,
    /// (user_id, video_id) -> saved-at. Uniqueness per pair falls out of the
    /// map key.
    saves: RwLock<HashMap<(i64, i64), DateTime<Utc>>>,

    user_id: AtomicI64,
    video_id: AtomicI64,
    comment_id: AtomicI64,
    challenge_id: AtomicI64,
    achievement_id: AtomicI64,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            videos: RwLock::new(HashMap::new()),
            comments: RwLock::new(HashMap::new()),
            challenges: RwLock::new(HashMap::new()),
            achievements: RwLock::new(HashMap::new()),
            saves: RwLock::new(HashMap::new()),
            user_id: AtomicI64::new(1),
            video_id: AtomicI64::new(1),
            comment_id: AtomicI64::new(1),
            challenge_id: AtomicI64::new(1),
            achievement_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Newest first: creation time descending, id descending as tie-break so the
/// order stays deterministic when timestamps collide.
fn sort_newest_first(videos: &mut [Video]) {
    videos.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl Storage for MemStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        // Check and insert under the same lock so two concurrent registrations
        // with the same username cannot both succeed.
        if users.values().any(|u| u.username == new.username) {
            return Err(StoreError::UsernameTaken(new.username));
        }

        let id = self.user_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            username: new.username,
            password: new.password,
            display_name: new.display_name,
            bio: new.bio,
            profile_image: new.profile_image,
            points: 0,
            role: new.role,
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    async fn get_top_users(&self, limit: usize) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.id.cmp(&b.id)));
        users.truncate(limit);
        users
    }

    async fn add_user_points(&self, user_id: i64, delta: i32) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id)?;
        user.points += delta;
        Some(user.clone())
    }

    async fn create_video(&self, new: NewVideo) -> Video {
        let id = self.video_id.fetch_add(1, Ordering::SeqCst);
        let video = Video {
            id,
            user_id: new.user_id,
            title: new.title,
            description: new.description,
            video_url: new.video_url,
            thumbnail_url: new.thumbnail_url,
            topic: new.topic,
            likes: 0,
            views: 0,
            comments: 0,
            shares: 0,
            status: VideoStatus::Pending,
            created_at: Utc::now(),
        };
        self.videos.write().await.insert(id, video.clone());
        video
    }

    async fn get_video(&self, id: i64) -> Option<Video> {
        self.videos.read().await.get(&id).cloned()
    }

    async fn get_videos_by_user(&self, user_id: i64) -> Vec<Video> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        sort_newest_first(&mut videos);
        videos
    }

    async fn get_approved_videos(&self, limit: usize, offset: usize) -> Vec<Video> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.status == VideoStatus::Approved)
            .cloned()
            .collect();
        sort_newest_first(&mut videos);
        videos.into_iter().skip(offset).take(limit).collect()
    }

    async fn get_videos_by_topic(&self, topic: &str, limit: usize, offset: usize) -> Vec<Video> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.status == VideoStatus::Approved && v.topic == topic)
            .cloned()
            .collect();
        sort_newest_first(&mut videos);
        videos.into_iter().skip(offset).take(limit).collect()
    }

    async fn get_pending_videos(&self, limit: usize) -> Vec<Video> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.status == VideoStatus::Pending)
            .cloned()
            .collect();
        sort_newest_first(&mut videos);
        videos.truncate(limit);
        videos
    }

    async fn review_video(&self, id: i64, status: VideoStatus) -> Result<Video, StoreError> {
        let mut videos = self.videos.write().await;
        let video = videos.get_mut(&id).ok_or(StoreError::NotFound("Video"))?;

        // Only pending videos are eligible for review. Approved and rejected
        // are terminal, otherwise a repeated approval would re-award points.
        if video.status != VideoStatus::Pending {
            return Err(StoreError::AlreadyReviewed);
        }

        video.status = status;
        Ok(video.clone())
    }

    async fn like_video(&self, id: i64) -> Option<Video> {
        let mut videos = self.videos.write().await;
        let video = videos.get_mut(&id)?;
        video.likes += 1;
        Some(video.clone())
    }

    async fn view_video(&self, id: i64) -> Option<Video> {
        let mut videos = self.videos.write().await;
        let video = videos.get_mut(&id)?;
        video.views += 1;
        Some(video.clone())
    }

    async fn create_comment(&self, new: NewComment) -> Result<Comment, StoreError> {
        // Lock order: videos before comments.
        let mut videos = self.videos.write().await;
        let video = videos
            .get_mut(&new.video_id)
            .ok_or(StoreError::NotFound("Video"))?;

        let mut comments = self.comments.write().await;
        let id = self.comment_id.fetch_add(1, Ordering::SeqCst);
        let comment = Comment {
            id,
            video_id: new.video_id,
            user_id: new.user_id,
            content: new.content,
            created_at: Utc::now(),
        };
        comments.insert(id, comment.clone());
        video.comments += 1;

        Ok(comment)
    }

    async fn get_comments_by_video(&self, video_id: i64) -> Vec<Comment> {
        let mut comments: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        comments
    }

    async fn create_challenge(&self, new: NewChallenge) -> Challenge {
        let id = self.challenge_id.fetch_add(1, Ordering::SeqCst);
        let challenge = Challenge {
            id,
            title: new.title,
            description: new.description,
            start_date: new.start_date,
            end_date: new.end_date,
            topic: new.topic,
            is_active: new.is_active,
        };
        self.challenges.write().await.insert(id, challenge.clone());
        challenge
    }

    async fn get_active_challenge(&self) -> Option<Challenge> {
        let now = Utc::now();
        self.challenges
            .read()
            .await
            .values()
            .filter(|c| c.is_active && c.start_date <= now && c.end_date >= now)
            // Deterministic tie-break when windows overlap: the most recently
            // created challenge wins.
            .max_by_key(|c| c.id)
            .cloned()
    }

    async fn get_all_challenges(&self) -> Vec<Challenge> {
        let mut challenges: Vec<Challenge> =
            self.challenges.read().await.values().cloned().collect();
        challenges.sort_by_key(|c| c.id);
        challenges
    }

    async fn create_achievement(&self, new: NewAchievement) -> Result<Achievement, StoreError> {
        if !self.users.read().await.contains_key(&new.user_id) {
            return Err(StoreError::NotFound("User"));
        }

        let id = self.achievement_id.fetch_add(1, Ordering::SeqCst);
        let achievement = Achievement {
            id,
            user_id: new.user_id,
            r#type: new.r#type,
            earned_at: Utc::now(),
        };
        self.achievements
            .write()
            .await
            .insert(id, achievement.clone());
        Ok(achievement)
    }

    async fn get_achievements_by_user(&self, user_id: i64) -> Vec<Achievement> {
        let mut achievements: Vec<Achievement> = self
            .achievements
            .read()
            .await
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        achievements.sort_by_key(|a| a.id);
        achievements
    }

    async fn save_video(&self, user_id: i64, video_id: i64) -> bool {
        let mut saves = self.saves.write().await;
        match saves.entry((user_id, video_id)) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(Utc::now());
                true
            }
        }
    }

    async fn unsave_video(&self, user_id: i64, video_id: i64) -> bool {
        self.saves
            .write()
            .await
            .remove(&(user_id, video_id))
            .is_some()
    }

    async fn get_saved_videos(&self, user_id: i64) -> Vec<Video> {
        let saved_ids: Vec<i64> = self
            .saves
            .read()
            .await
            .keys()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, vid)| *vid)
            .collect();

        let videos = self.videos.read().await;
        let mut saved: Vec<Video> = saved_ids
            .into_iter()
            .filter_map(|vid| videos.get(&vid).cloned())
            .collect();
        sort_newest_first(&mut saved);
        saved
    }

    async fn is_video_saved(&self, user_id: i64, video_id: i64) -> bool {
        self.saves
            .read()
            .await
            .contains_key(&(user_id, video_id))
    }
}
