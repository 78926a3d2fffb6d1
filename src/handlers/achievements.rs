use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError, models::achievement::CreateAchievementRequest, state::DynStorage,
    store::NewAchievement, utils::jwt::AdminUser,
};

/// Record a badge for a user.
/// Admin only; badge rules are not automated, this is the manual award path.
pub async fn create_achievement(
    State(store): State<DynStorage>,
    _admin: AdminUser,
    Json(payload): Json<CreateAchievementRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let achievement = store
        .create_achievement(NewAchievement {
            user_id: payload.user_id,
            r#type: payload.r#type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(achievement)))
}

/// List a user's achievements.
pub async fn list_user_achievements(
    State(store): State<DynStorage>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.get_achievements_by_user(user_id).await))
}
