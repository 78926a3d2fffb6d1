use serde::{Deserialize, Serialize};
use validator::Validate;

/// A time-boxed community challenge, e.g. "plastic-free grocery haul".
///
/// A challenge counts as active when `is_active` is set AND the current moment
/// falls within [start_date, end_date]. The flag is never written back when the
/// window lapses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
    pub topic: String,
    pub is_active: bool,
}

/// DTO for creating a new challenge.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChallengeRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 characters."
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description length must be between 1 and 2000 characters."
    ))]
    pub description: String,

    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Topic length must be between 1 and 50 characters."
    ))]
    pub topic: String,

    /// Defaults to true when unset.
    pub is_active: Option<bool>,
}
