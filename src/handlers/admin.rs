// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::video::{PendingListParams, ReviewVideoRequest, VideoStatus},
    state::DynStorage,
    store::POINTS_APPROVAL,
};

/// The moderation queue: pending videos, newest first.
/// Admin only.
pub async fn list_pending_videos(
    State(store): State<DynStorage>,
    Query(params): Query<PendingListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(10).min(100);
    Ok(Json(store.get_pending_videos(limit).await))
}

/// Review a pending video.
/// Admin only.
///
/// `pending -> approved` grants the uploader a 20-point bonus;
/// `pending -> rejected` grants nothing. Both states are terminal: a second
/// review attempt returns 409 and never re-awards.
pub async fn review_video(
    State(store): State<DynStorage>,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewVideoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = match payload.status.as_str() {
        "approved" => VideoStatus::Approved,
        "rejected" => VideoStatus::Rejected,
        _ => return Err(AppError::BadRequest("Invalid status".to_string())),
    };

    let video = store.review_video(id, status).await?;

    // If approved, give points to the creator.
    if status == VideoStatus::Approved {
        store.add_user_points(video.user_id, POINTS_APPROVAL).await;
    }

    tracing::info!("video {} reviewed: {:?}", video.id, video.status);

    Ok(Json(video))
}
