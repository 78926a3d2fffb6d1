// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{achievements, admin, auth, challenges, comments, users, videos},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, users, videos, comments, challenges,
///   achievements, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (storage handle + config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // "/saved-videos" must stay a static segment so it wins over "/{id}".
    let user_routes = Router::new()
        .route("/saved-videos", get(users::list_saved_videos))
        .route("/username/{username}", get(users::get_user_by_username))
        .route("/{id}", get(users::get_user))
        .route("/{id}/videos", get(users::list_user_videos))
        .route(
            "/{id}/achievements",
            get(achievements::list_user_achievements),
        );

    // Upload, save and comment creation authenticate via the Claims
    // extractor, so the mixed public/protected method routes can share paths.
    let video_routes = Router::new()
        .route("/", get(videos::list_videos).post(videos::upload_video))
        .route("/{id}", get(videos::get_video))
        .route("/{id}/like", post(videos::like_video))
        .route("/{id}/view", post(videos::view_video))
        .route("/{id}/save", post(videos::save_video))
        .route("/{id}/comments", get(comments::list_comments));

    let comment_routes = Router::new().route("/", post(comments::create_comment));

    let challenge_routes = Router::new()
        .route(
            "/",
            get(challenges::list_challenges).post(challenges::create_challenge),
        )
        .route("/active", get(challenges::get_active_challenge));

    let achievement_routes = Router::new().route("/", post(achievements::create_achievement));

    let admin_routes = Router::new()
        .route("/pending-videos", get(admin::list_pending_videos))
        .route("/videos/{id}/review", post(admin::review_video))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/videos", video_routes)
        .nest("/api/comments", comment_routes)
        .nest("/api/challenges", challenge_routes)
        .nest("/api/achievements", achievement_routes)
        .nest("/api/admin", admin_routes)
        .route("/api/leaderboard", get(users::leaderboard))
        // Serve uploaded media files
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
