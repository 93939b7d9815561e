use sea_orm::entity::prelude::*;

use crate::domain::Role;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub role: Role,

    /// Forces password rotation on next login.
    pub must_change_password: bool,

    /// Optimistic concurrency counter, bumped on every row update.
    pub version: i32,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session_tokens::Entity")]
    SessionTokens,
    #[sea_orm(has_many = "super::account_departments::Entity")]
    AccountDepartments,
}

impl Related<super::session_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionTokens.def()
    }
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        super::account_departments::Relation::Department.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::account_departments::Relation::Account.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
