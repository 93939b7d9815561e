use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::constants::versioning::VERSION_CEILING;
use crate::domain::Role;
use crate::entities::{account_departments, accounts, prelude::*};

/// Column changes carried by one versioned account update.
///
/// An empty change set still bumps the version and `updated_at`; that is the
/// relationship touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub must_change_password: Option<bool>,
}

/// Result of a version-checked update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedUpdate {
    /// The row matched the expected version and now holds the bumped one.
    Applied(accounts::Model),
    /// The row exists but its version differs from the expected one.
    Stale(accounts::Model),
    Missing,
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<accounts::Model>, DbErr> {
        Accounts::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.conn)
            .await
    }

    pub async fn get(&self, id: i32) -> Result<Option<accounts::Model>, DbErr> {
        Accounts::find_by_id(id).one(&self.conn).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<accounts::Model>, DbErr> {
        Accounts::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
    }

    pub async fn create(
        &self,
        username: &str,
        password_hash: String,
        role: Role,
    ) -> Result<accounts::Model, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        accounts::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            role: Set(role),
            must_change_password: Set(true),
            version: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
    }

    /// Deletes the account; session tokens and memberships cascade.
    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = Accounts::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn department_ids(&self, account_id: i32) -> Result<Vec<i32>, DbErr> {
        let rows = AccountDepartments::find()
            .filter(account_departments::Column::AccountId.eq(account_id))
            .order_by_asc(account_departments::Column::DepartmentId)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(|r| r.department_id).collect())
    }

    /// Applies `changes` only if the stored version still equals `expected_version`.
    ///
    /// Version check, increment and write are one conditional `UPDATE`, so two
    /// writers holding the same version cannot both succeed.
    pub async fn update_versioned<C: ConnectionTrait>(
        conn: &C,
        id: i32,
        expected_version: i32,
        changes: &AccountChanges,
    ) -> Result<VersionedUpdate, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let mut update = Accounts::update_many()
            .col_expr(accounts::Column::Version, next_version_expr())
            .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
            .filter(accounts::Column::Id.eq(id))
            .filter(accounts::Column::Version.eq(expected_version));

        if let Some(username) = &changes.username {
            update = update.col_expr(accounts::Column::Username, Expr::value(username.clone()));
        }
        if let Some(hash) = &changes.password_hash {
            update = update.col_expr(accounts::Column::PasswordHash, Expr::value(hash.clone()));
        }
        if let Some(role) = changes.role {
            update = update.col_expr(accounts::Column::Role, Expr::value(role));
        }
        if let Some(flag) = changes.must_change_password {
            update = update.col_expr(accounts::Column::MustChangePassword, Expr::value(flag));
        }

        // With RETURNING the written row comes back from the UPDATE itself.
        // Without it the re-read is only exact inside the caller's transaction.
        let applied = if conn.support_returning() {
            update.exec_with_returning(conn).await?.into_iter().next()
        } else if update.exec(conn).await?.rows_affected > 0 {
            Accounts::find_by_id(id).one(conn).await?
        } else {
            None
        };

        if let Some(model) = applied {
            return Ok(VersionedUpdate::Applied(model));
        }

        Ok(match Accounts::find_by_id(id).one(conn).await? {
            Some(model) => VersionedUpdate::Stale(model),
            None => VersionedUpdate::Missing,
        })
    }
}

/// SQL form of [`crate::domain::next_version`].
fn next_version_expr() -> SimpleExpr {
    Expr::case(
        Expr::col(accounts::Column::Version).lt(VERSION_CEILING),
        Expr::col(accounts::Column::Version).add(1),
    )
    .finally(0)
    .into()
}
