use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::users;

/// Errors surfaced by the user repository.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("user not found")]
    NotFound,

    #[error("malformed user id: {0}")]
    InvalidId(String),

    #[error("storage error: {0}")]
    Database(#[from] DbErr),
}

/// User record as the rest of the service sees it. The digest stays out of
/// every serialized form.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,

    pub name: String,

    #[serde(skip)]
    pub password_digest: String,

    #[serde(rename = "isadmin")]
    pub is_admin: bool,
}

impl TryFrom<users::Model> for User {
    type Error = RepoError;

    fn try_from(model: users::Model) -> Result<Self, RepoError> {
        let id = Uuid::parse_str(&model.id).map_err(|_| RepoError::InvalidId(model.id.clone()))?;
        Ok(Self {
            id,
            name: model.name,
            password_digest: model.password_digest,
            is_admin: model.is_admin,
        })
    }
}

impl From<&User> for users::ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: Set(user.id.to_string()),
            name: Set(user.name.clone()),
            password_digest: Set(user.password_digest.clone()),
            is_admin: Set(user.is_admin),
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// List every user in the roster.
    pub async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let models = users::Entity::find().all(&self.conn).await?;

        models.into_iter().map(User::try_from).collect()
    }

    /// Look a user up by id.
    ///
    /// A string that does not parse as a UUID is [`RepoError::InvalidId`],
    /// never [`RepoError::NotFound`].
    pub async fn find_by_id(&self, id: &str) -> Result<User, RepoError> {
        let id = Uuid::parse_str(id).map_err(|_| RepoError::InvalidId(id.to_string()))?;

        let model = users::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .ok_or(RepoError::NotFound)?;

        User::try_from(model)
    }

    /// Look a user up by name. First match wins when names collide.
    pub async fn find_by_name(&self, name: &str) -> Result<User, RepoError> {
        let model = users::Entity::find()
            .filter(users::Column::Name.eq(name))
            .one(&self.conn)
            .await?
            .ok_or(RepoError::NotFound)?;

        User::try_from(model)
    }

    /// Find the user matching both name and password digest exactly.
    ///
    /// A miss on either field is the same [`RepoError::NotFound`].
    pub async fn verify_credentials(&self, name: &str, digest: &str) -> Result<User, RepoError> {
        let model = users::Entity::find()
            .filter(users::Column::Name.eq(name))
            .filter(users::Column::PasswordDigest.eq(digest))
            .one(&self.conn)
            .await?
            .ok_or(RepoError::NotFound)?;

        User::try_from(model)
    }

    /// Insert a user. The id must already be assigned by the caller.
    pub async fn insert(&self, user: &User) -> Result<(), RepoError> {
        let active: users::ActiveModel = user.into();
        users::Entity::insert(active).exec(&self.conn).await?;

        Ok(())
    }

    /// Replace the full record matched by `user.id`.
    pub async fn update(&self, user: &User) -> Result<(), RepoError> {
        let active: users::ActiveModel = user.into();
        match active.update(&self.conn).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(RepoError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    /// Remove the record with the given id.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = users::Entity::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
