use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError, models::user::LeaderboardParams, state::DynStorage, utils::jwt::Claims,
};

/// Get a user's public profile.
pub async fn get_user(
    State(store): State<DynStorage>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .get_user(id)
        .await
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Look up a user by username.
pub async fn get_user_by_username(
    State(store): State<DynStorage>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .get_user_by_username(&username)
        .await
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// List a user's videos, newest first. Includes pending and rejected entries;
/// the feed endpoints are the ones that filter by approval.
pub async fn list_user_videos(
    State(store): State<DynStorage>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.get_videos_by_user(id).await))
}

/// Users ranked by points, descending.
pub async fn leaderboard(
    State(store): State<DynStorage>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(10).min(100);
    Ok(Json(store.get_top_users(limit).await))
}

/// List the authenticated user's saved videos, newest first.
pub async fn list_saved_videos(
    State(store): State<DynStorage>,
    claims: Claims,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.get_saved_videos(claims.user_id()).await))
}
