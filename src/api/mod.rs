use axum::{
    Router,
    routing::{get, post},
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};

use crate::config::SessionConfig;
use crate::constants::session;
use crate::db::Store;
use crate::services::{AuthService, StoreAuthService};

pub mod auth;
mod error;
pub mod types;
pub mod users;

pub use error::ApiError;
pub use types::*;

/// Everything a handler needs, constructed once at startup and injected.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub auth: Arc<dyn AuthService>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store) -> Self {
        let auth = Arc::new(StoreAuthService::new(store.clone()));
        Self { store, auth }
    }
}

/// Expand the configured secret into the 64 bytes `cookie::Key` wants.
/// Domain-separated so the two halves differ even for equal inputs.
#[must_use]
pub fn signing_key(secret: &str) -> Key {
    let mut material = [0u8; 64];

    let mut hasher = Sha256::new();
    hasher.update(b"session-signing/0");
    hasher.update(secret.as_bytes());
    material[..32].copy_from_slice(&hasher.finalize());

    let mut hasher = Sha256::new();
    hasher.update(b"session-signing/1");
    hasher.update(secret.as_bytes());
    material[32..].copy_from_slice(&hasher.finalize());

    Key::from(&material)
}

pub fn router(state: AppState, session_config: &SessionConfig) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_signed(signing_key(&session_config.secret))
        .with_name(session::COOKIE_NAME)
        .with_path("/".to_string())
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        // HttpOnly is a config switch, off by default.
        .with_http_only(session_config.http_only)
        .with_expiry(Expiry::OnInactivity(Duration::days(session::MAX_AGE_DAYS)));

    Router::new()
        .route(
            "/users",
            get(users::list_users)
                .post(users::create_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}", get(users::get_user))
        .route("/free", get(users::list_users))
        .route("/user", post(auth::login).get(auth::current_user))
        .route("/user/{name}", get(users::get_user_by_name))
        .route("/admin/{name}", get(users::get_user_by_name))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
