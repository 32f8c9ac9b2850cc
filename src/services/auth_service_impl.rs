//! Store-backed implementation of the [`AuthService`] trait.

use async_trait::async_trait;

use crate::db::{Store, User};
use crate::services::auth_service::{AuthError, AuthService, LoginOutcome, digest};

pub struct StoreAuthService {
    store: Store,
}

impl StoreAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for StoreAuthService {
    async fn login(&self, name: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let digest = digest(password);

        // Name miss and digest miss collapse into the same error via
        // From<RepoError>; only genuine storage failures stay distinct.
        let user = self.store.verify_credentials(name, &digest).await?;

        Ok(LoginOutcome { user, digest })
    }

    async fn identify(&self, name: &str) -> Result<User, AuthError> {
        let user = self.store.find_user_by_name(name).await?;

        Ok(user)
    }
}
