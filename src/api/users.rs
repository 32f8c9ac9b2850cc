use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use super::{ApiError, AppState, ResultBody, UserPayload};
use crate::db::{RepoError, User};
use crate::services::digest;

/// GET /users (and GET /free — the alias applies no auth distinction).
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    tracing::info!("listing all users");

    let users = state.store.find_all_users().await.map_err(ApiError::storage)?;

    Ok(Json(users))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    tracing::info!(%id, "finding user by id");

    let user = state
        .store
        .find_user_by_id(&id)
        .await
        .map_err(|err| match err {
            // A malformed id and a lookup miss surface identically.
            RepoError::NotFound | RepoError::InvalidId(_) => ApiError::InvalidUserId,
            RepoError::Database(e) => ApiError::storage(e),
        })?;

    Ok(Json(user))
}

/// GET /user/{name} (and GET /admin/{name} — no elevated-privilege check).
pub async fn get_user_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<User>, ApiError> {
    tracing::info!(%name, "finding user by name");

    let user = state
        .store
        .find_user_by_name(&name)
        .await
        .map_err(|err| match err {
            RepoError::NotFound | RepoError::InvalidId(_) => ApiError::InvalidUserName,
            RepoError::Database(e) => ApiError::storage(e),
        })?;

    Ok(Json(user))
}

/// POST /users
///
/// The id is assigned here, at the caller boundary, before insert.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::MalformedPayload)?;

    tracing::info!(name = %payload.name, "creating user");

    let user = User {
        id: Uuid::new_v4(),
        name: payload.name,
        password_digest: payload.password.as_deref().map(digest).unwrap_or_default(),
        is_admin: payload.is_admin,
    };

    state
        .store
        .insert_user(&user)
        .await
        .map_err(ApiError::storage)?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users — full replace of the record matched by the body's id.
pub async fn update_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<ResultBody>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::MalformedPayload)?;
    let id = payload.id.ok_or(ApiError::MalformedPayload)?;

    tracing::info!(%id, "updating user");

    let user = User {
        id,
        name: payload.name,
        password_digest: payload.password.as_deref().map(digest).unwrap_or_default(),
        is_admin: payload.is_admin,
    };

    state
        .store
        .update_user(&user)
        .await
        .map_err(ApiError::storage)?;

    Ok(Json(ResultBody::success()))
}

/// DELETE /users — the body is a full user object, but only its id decides
/// what is removed.
pub async fn delete_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<ResultBody>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::MalformedPayload)?;
    let id = payload.id.ok_or(ApiError::MalformedPayload)?;

    tracing::info!(%id, "deleting user");

    state
        .store
        .delete_user(id)
        .await
        .map_err(ApiError::storage)?;

    Ok(Json(ResultBody::success()))
}
