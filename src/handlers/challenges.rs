use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError, models::challenge::CreateChallengeRequest, state::DynStorage,
    store::NewChallenge, utils::jwt::AdminUser,
};

/// Create a new challenge.
/// Admin only. `is_active` defaults to true when unset.
pub async fn create_challenge(
    State(store): State<DynStorage>,
    admin: AdminUser,
    Json(payload): Json<CreateChallengeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.end_date <= payload.start_date {
        return Err(AppError::BadRequest(
            "end_date must be after start_date".to_string(),
        ));
    }

    let challenge = store
        .create_challenge(NewChallenge {
            title: payload.title,
            description: payload.description,
            start_date: payload.start_date,
            end_date: payload.end_date,
            topic: payload.topic,
            is_active: payload.is_active.unwrap_or(true),
        })
        .await;

    tracing::info!(
        "admin {} created challenge {} ({})",
        admin.0.user_id(),
        challenge.id,
        challenge.title
    );

    Ok((StatusCode::CREATED, Json(challenge)))
}

/// The currently active challenge, if any.
pub async fn get_active_challenge(
    State(store): State<DynStorage>,
) -> Result<impl IntoResponse, AppError> {
    let challenge = store
        .get_active_challenge()
        .await
        .ok_or(AppError::NotFound("No active challenge found".to_string()))?;

    Ok(Json(challenge))
}

/// List all challenges, oldest first.
pub async fn list_challenges(
    State(store): State<DynStorage>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.get_all_challenges().await))
}
