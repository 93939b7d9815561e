use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    JoinType, ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::crypto::SealedField;
use crate::entities::{
    account_departments, accounts, department_links, departments, links, prelude::*,
};

pub struct DepartmentRepository {
    conn: DatabaseConnection,
}

impl DepartmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<departments::Model>, DbErr> {
        Departments::find()
            .order_by_asc(departments::Column::Id)
            .all(&self.conn)
            .await
    }

    pub async fn get(&self, id: i32) -> Result<Option<departments::Model>, DbErr> {
        Departments::find_by_id(id).one(&self.conn).await
    }

    pub async fn find_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<departments::Model>, DbErr> {
        Departments::find()
            .filter(departments::Column::NameFingerprint.eq(fingerprint))
            .one(&self.conn)
            .await
    }

    pub async fn create(&self, name: SealedField) -> Result<departments::Model, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        departments::ActiveModel {
            name_cipher: Set(name.ciphertext),
            name_fingerprint: Set(name.fingerprint),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
    }

    pub async fn rename(
        &self,
        department: departments::Model,
        name: SealedField,
    ) -> Result<departments::Model, DbErr> {
        let mut active: departments::ActiveModel = department.into();
        active.name_cipher = Set(name.ciphertext);
        active.name_fingerprint = Set(name.fingerprint);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await
    }

    /// Deletes the department inside the caller's transaction; only its
    /// association rows go with it.
    pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<bool, DbErr> {
        let result = Departments::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Current rows of every member account, read on `conn`.
    pub async fn members<C: ConnectionTrait>(
        conn: &C,
        department_id: i32,
    ) -> Result<Vec<accounts::Model>, DbErr> {
        Accounts::find()
            .join(JoinType::InnerJoin, accounts::Relation::AccountDepartments.def())
            .filter(account_departments::Column::DepartmentId.eq(department_id))
            .order_by_asc(accounts::Column::Id)
            .all(conn)
            .await
    }

    pub async fn links(&self, department: &departments::Model) -> Result<Vec<links::Model>, DbErr> {
        department
            .find_related(Links)
            .order_by_asc(links::Column::Id)
            .all(&self.conn)
            .await
    }

    pub async fn account_ids(&self, department_id: i32) -> Result<Vec<i32>, DbErr> {
        let rows = AccountDepartments::find()
            .filter(account_departments::Column::DepartmentId.eq(department_id))
            .order_by_asc(account_departments::Column::AccountId)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(|r| r.account_id).collect())
    }

    pub async fn add_link(&self, department_id: i32, link_id: i32) -> Result<(), DbErr> {
        DepartmentLinks::insert(department_links::ActiveModel {
            department_id: Set(department_id),
            link_id: Set(link_id),
        })
        .exec_without_returning(&self.conn)
        .await?;
        Ok(())
    }

    pub async fn remove_link(&self, department_id: i32, link_id: i32) -> Result<bool, DbErr> {
        let result = DepartmentLinks::delete_by_id((department_id, link_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Inserts a membership row inside the caller's transaction.
    pub async fn add_account<C: ConnectionTrait>(
        conn: &C,
        department_id: i32,
        account_id: i32,
    ) -> Result<(), DbErr> {
        AccountDepartments::insert(account_departments::ActiveModel {
            account_id: Set(account_id),
            department_id: Set(department_id),
        })
        .exec_without_returning(conn)
        .await?;
        Ok(())
    }

    pub async fn remove_account<C: ConnectionTrait>(
        conn: &C,
        department_id: i32,
        account_id: i32,
    ) -> Result<bool, DbErr> {
        let result = AccountDepartments::delete_by_id((account_id, department_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
