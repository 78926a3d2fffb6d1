use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::video::{SaveVideoRequest, UploadVideoRequest, VideoListParams},
    state::DynStorage,
    store::{NewVideo, POINTS_LIKE_RECEIVED, POINTS_UPLOAD},
    utils::{html::clean_html, jwt::Claims},
};

/// Upload a new video.
///
/// Expects a multipart form with a `video` file field plus the metadata
/// fields (title, topic, optional description/thumbnail_url). The file is
/// persisted under the upload directory with a generated name, the video
/// record starts out pending, and the uploader earns 10 points.
pub async fn upload_video(
    State(store): State<DynStorage>,
    State(config): State<Config>,
    claims: Claims,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut meta = UploadVideoRequest::default();
    let mut file: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("video") => {
                // Keep the original extension so the served file has a
                // sensible content type; the name itself is generated.
                let extension = field
                    .file_name()
                    .and_then(|n| std::path::Path::new(n).extension())
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((extension, bytes));
            }
            Some("title") => {
                meta.title = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                meta.description = Some(text);
            }
            Some("topic") => {
                meta.topic = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            Some("thumbnail_url") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                meta.thumbnail_url = Some(text);
            }
            _ => {}
        }
    }

    let (extension, bytes) = match file {
        Some((extension, bytes)) if !bytes.is_empty() => (extension, bytes),
        _ => return Err(AppError::BadRequest("No video file uploaded".to_string())),
    };

    if let Err(validation_errors) = meta.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let filename = format!("{}{}", Uuid::new_v4(), extension);
    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tokio::fs::write(
        std::path::Path::new(&config.upload_dir).join(&filename),
        &bytes,
    )
    .await?;

    let user_id = claims.user_id();
    let video = store
        .create_video(NewVideo {
            user_id,
            title: meta.title,
            description: meta.description.map(|d| clean_html(&d)),
            video_url: format!("/uploads/{}", filename),
            thumbnail_url: meta.thumbnail_url,
            topic: meta.topic,
        })
        .await;

    // Award points for uploading.
    store.add_user_points(user_id, POINTS_UPLOAD).await;

    tracing::info!("user {} uploaded video {} ({})", user_id, video.id, video.title);

    Ok((StatusCode::CREATED, Json(video)))
}

/// The approved-video feed, newest first, optionally topic-filtered and
/// paginated via offset/limit.
pub async fn list_videos(
    State(store): State<DynStorage>,
    Query(params): Query<VideoListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(10).min(100);
    let offset = params.offset.unwrap_or(0);

    let videos = match params.topic.as_deref() {
        Some(topic) if topic != "all" => store.get_videos_by_topic(topic, limit, offset).await,
        _ => store.get_approved_videos(limit, offset).await,
    };

    Ok(Json(videos))
}

/// Get a single video. Fetching it counts as a view.
pub async fn get_video(
    State(store): State<DynStorage>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let video = store
        .view_video(id)
        .await
        .ok_or(AppError::NotFound("Video not found".to_string()))?;

    Ok(Json(video))
}

/// Like a video: the counter goes up and the owner earns a point.
/// There is no unlike, and a user may like the same video repeatedly.
pub async fn like_video(
    State(store): State<DynStorage>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let video = store
        .like_video(id)
        .await
        .ok_or(AppError::NotFound("Video not found".to_string()))?;

    // Award a point to the video creator.
    store
        .add_user_points(video.user_id, POINTS_LIKE_RECEIVED)
        .await;

    Ok(Json(video))
}

/// Record a view. Views never award points.
pub async fn view_video(
    State(store): State<DynStorage>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let video = store
        .view_video(id)
        .await
        .ok_or(AppError::NotFound("Video not found".to_string()))?;

    Ok(Json(video))
}

/// Save or unsave a video for the authenticated user.
///
/// Both directions are idempotent: saving twice leaves one record, unsaving
/// an unsaved video is a no-op.
pub async fn save_video(
    State(store): State<DynStorage>,
    claims: Claims,
    Path(id): Path<i64>,
    Json(payload): Json<SaveVideoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    store
        .get_video(id)
        .await
        .ok_or(AppError::NotFound("Video not found".to_string()))?;

    let action = payload.action.unwrap_or_else(|| "save".to_string());
    match action.as_str() {
        "save" => {
            store.save_video(user_id, id).await;
        }
        "unsave" => {
            store.unsave_video(user_id, id).await;
        }
        _ => return Err(AppError::BadRequest("Invalid action".to_string())),
    }

    Ok(Json(serde_json::json!({ "success": true, "action": action })))
}
