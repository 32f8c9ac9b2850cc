use axum::{Form, Json, extract::State};
use tower_sessions::Session;

use super::{ApiError, AppState, LoginForm};
use crate::constants::session as session_keys;
use crate::db::User;
use crate::services::AuthError;

/// POST /user
///
/// Form login. On success the session is populated with the user's name and
/// password digest; the session layer signs and attaches the cookie when
/// the response leaves.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<User>, ApiError> {
    tracing::info!(name = %form.login, "login attempt");

    // Every verification miss is the same opaque failure; a storage outage
    // is not allowed to leak which field mismatched either.
    let outcome = state
        .auth
        .login(&form.login, &form.password)
        .await
        .map_err(|_| ApiError::InvalidCredentials)?;

    session
        .insert(session_keys::NAME_KEY, &outcome.user.name)
        .await
        .map_err(ApiError::session)?;
    session
        .insert(session_keys::PASSWORD_KEY, &outcome.digest)
        .await
        .map_err(ApiError::session)?;

    tracing::info!(name = %outcome.user.name, "login succeeded");

    Ok(Json(outcome.user))
}

/// GET /user
///
/// Resolves the session cookie back to a user and responds with the stored
/// password digest. The session is only trusted if the stored name still
/// resolves against the roster.
pub async fn current_user(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<String>, ApiError> {
    let name: String = session
        .get(session_keys::NAME_KEY)
        .await
        .map_err(ApiError::session)?
        .ok_or(ApiError::InvalidUserName)?;

    let stored_digest: String = session
        .get(session_keys::PASSWORD_KEY)
        .await
        .map_err(ApiError::session)?
        .ok_or(ApiError::InvalidUserName)?;

    tracing::info!(%name, "identifying user by session cookie");

    state.auth.identify(&name).await.map_err(|err| match err {
        AuthError::Storage(msg) => ApiError::storage(msg),
        AuthError::InvalidCredentials | AuthError::Unauthenticated => ApiError::InvalidUserName,
    })?;

    Ok(Json(stored_digest))
}
