// src/models/user.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_]+$").expect("valid username regex"));

/// User role. Admins moderate pending videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub display_name: String,

    pub bio: Option<String>,

    /// URL of the profile picture, if any.
    pub profile_image: Option<String>,

    /// Cumulative score from upload/like/comment/approval events.
    pub points: i32,

    pub role: Role,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Username length must be between 3 and 50 characters."
        ),
        regex(
            path = *USERNAME_RE,
            message = "Username may only contain letters, digits and underscores."
        )
    )]
    pub username: String,

    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,

    #[validate(length(
        min = 1,
        max = 50,
        message = "Display name length must be between 1 and 50 characters."
    ))]
    pub display_name: String,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters."))]
    pub bio: Option<String>,

    #[validate(custom(function = crate::models::validate_url_string))]
    pub profile_image: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    /// Number of users to return (default: 10, max: 100).
    pub limit: Option<usize>,
}
