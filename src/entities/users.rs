use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// UUID, stored textually. Assigned by the caller boundary, not the db.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    // No unique index: lookups take the first match.
    pub name: String,

    /// SHA-256 hex digest of the password. Empty when no password was set.
    pub password_digest: String,

    pub is_admin: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
