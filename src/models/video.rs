use serde::{Deserialize, Serialize};
use validator::Validate;

/// Moderation state of a video.
///
/// Every upload starts out `Pending`. An admin review moves it to `Approved`
/// or `Rejected` exactly once; both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Pending,
    Approved,
    Rejected,
}

/// A short sustainability video uploaded by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,

    /// Owning user.
    pub user_id: i64,

    pub title: String,
    pub description: Option<String>,

    /// Location of the stored media file (e.g., "/uploads/<name>.mp4").
    pub video_url: String,
    pub thumbnail_url: Option<String>,

    /// Subject tag, e.g. "energy" or "waste".
    pub topic: String,

    pub likes: i32,
    pub views: i32,
    pub comments: i32,
    pub shares: i32,

    pub status: VideoStatus,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Metadata accompanying a video upload. The media file itself arrives as a
/// separate multipart field and is validated by presence, not by schema.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UploadVideoRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 characters."
    ))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters."))]
    pub description: Option<String>,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Topic length must be between 1 and 50 characters."
    ))]
    pub topic: String,

    #[validate(custom(function = crate::models::validate_url_string))]
    pub thumbnail_url: Option<String>,
}

/// Query parameters for the approved-video feed.
#[derive(Debug, Deserialize)]
pub struct VideoListParams {
    /// Topic filter. Absent or "all" means no filtering.
    pub topic: Option<String>,

    /// Number of items to return (default: 10, max: 100).
    pub limit: Option<usize>,

    /// Number of items to skip (default: 0).
    pub offset: Option<usize>,
}

/// Query parameters for the admin pending-video queue.
#[derive(Debug, Deserialize)]
pub struct PendingListParams {
    pub limit: Option<usize>,
}

/// Body of a save/unsave request.
#[derive(Debug, Deserialize)]
pub struct SaveVideoRequest {
    /// "save" (default) or "unsave".
    pub action: Option<String>,
}

/// Body of an admin review action.
///
/// `status` is kept as a raw string so an unknown value surfaces as a 400
/// with a clear message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ReviewVideoRequest {
    pub status: String,
}
