use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::comment::CreateCommentRequest,
    state::DynStorage,
    store::{NewComment, POINTS_COMMENT},
    utils::{html::clean_html, jwt::Claims},
};

/// Create a new comment.
///
/// The store bumps the parent video's comment counter in the same critical
/// section; the commenter earns a point.
pub async fn create_comment(
    State(store): State<DynStorage>,
    claims: Claims,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user_id = claims.user_id();

    let comment = store
        .create_comment(NewComment {
            video_id: payload.video_id,
            user_id,
            content: clean_html(&payload.content),
        })
        .await?;

    // Award a point for commenting.
    store.add_user_points(user_id, POINTS_COMMENT).await;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// List all comments for a video, newest first.
pub async fn list_comments(
    State(store): State<DynStorage>,
    Path(video_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(store.get_comments_by_video(video_id).await))
}
