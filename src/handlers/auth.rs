// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, Role},
    state::DynStorage,
    store::NewUser,
    utils::{
        hash::{hash_password, verify_password},
        html::clean_html,
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it. The store enforces
/// username uniqueness; a duplicate surfaces as 409 Conflict.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(store): State<DynStorage>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = store
        .create_user(NewUser {
            username: payload.username,
            password: hashed_password,
            display_name: payload.display_name,
            bio: payload.bio.map(|b| clean_html(&b)),
            profile_image: payload.profile_image,
            role: Role::User,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
///
/// Verifies the username and password against the store.
/// If valid, signs a JWT token with the user's ID and role.
pub async fn login(
    State(store): State<DynStorage>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = store
        .get_user_by_username(&payload.username)
        .await
        .ok_or(AppError::AuthError("User not found".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(
        user.id,
        user.role,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "user": user,
    })))
}
