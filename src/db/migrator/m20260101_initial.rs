use crate::constants::bootstrap;
use crate::domain::Role;
use crate::entities::{accounts, prelude::*};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Hash the bootstrap password using Argon2id
fn hash_bootstrap_password() -> Result<String, DbErr> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(bootstrap::PASSWORD.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash bootstrap password: {e}")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Accounts)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Departments)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Links)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(SessionTokens)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(AccountDepartments)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(DepartmentLinks)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Bootstrap superadmin; the password must be rotated on first login
        let now = chrono::Utc::now().to_rfc3339();
        let password_hash = hash_bootstrap_password()?;

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Accounts)
            .columns([
                accounts::Column::Username,
                accounts::Column::PasswordHash,
                accounts::Column::Role,
                accounts::Column::MustChangePassword,
                accounts::Column::Version,
                accounts::Column::CreatedAt,
                accounts::Column::UpdatedAt,
            ])
            .values_panic([
                bootstrap::USERNAME.into(),
                password_hash.into(),
                Role::SuperAdmin.as_str().into(),
                true.into(),
                0.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DepartmentLinks).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccountDepartments).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionTokens).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Links).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts).to_owned())
            .await?;

        Ok(())
    }
}
