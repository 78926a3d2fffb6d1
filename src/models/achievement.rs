use serde::{Deserialize, Serialize};
use validator::Validate;

/// A badge earned by a user, e.g. "green_beginner" or "energy_saver".
/// Achievements are append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub user_id: i64,
    pub r#type: String,
    pub earned_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for recording a new achievement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAchievementRequest {
    pub user_id: i64,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Achievement type length must be between 1 and 50 characters."
    ))]
    pub r#type: String,
}
