use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

pub mod migrator;
pub mod repositories;

pub use repositories::user::{RepoError, User};

use crate::config::StorageConfig;

/// The one handle to the storage collaborator. Connected once at startup,
/// cloned into whatever needs it; the pool underneath is safe for
/// concurrent use by in-flight requests.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        Self::with_pool_options(&config.url, config.max_connections, config.min_connections).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn find_all_users(&self) -> Result<Vec<User>, RepoError> {
        self.user_repo().find_all().await
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<User, RepoError> {
        self.user_repo().find_by_id(id).await
    }

    pub async fn find_user_by_name(&self, name: &str) -> Result<User, RepoError> {
        self.user_repo().find_by_name(name).await
    }

    pub async fn verify_credentials(&self, name: &str, digest: &str) -> Result<User, RepoError> {
        self.user_repo().verify_credentials(name, digest).await
    }

    pub async fn insert_user(&self, user: &User) -> Result<(), RepoError> {
        self.user_repo().insert(user).await
    }

    pub async fn update_user(&self, user: &User) -> Result<(), RepoError> {
        self.user_repo().update(user).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), RepoError> {
        self.user_repo().delete(id).await
    }
}
