use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::crypto::SealedField;
use crate::entities::{prelude::*, session_tokens};

pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        account_id: i32,
        token: SealedField,
        expires_at: String,
    ) -> Result<session_tokens::Model, DbErr> {
        session_tokens::ActiveModel {
            account_id: Set(account_id),
            token_cipher: Set(token.ciphertext),
            token_fingerprint: Set(token.fingerprint),
            expires_at: Set(expires_at),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
    }

    pub async fn find_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<session_tokens::Model>, DbErr> {
        SessionTokens::find()
            .filter(session_tokens::Column::TokenFingerprint.eq(fingerprint))
            .one(&self.conn)
            .await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = SessionTokens::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Destroys every token issued to `account_id`.
    pub async fn delete_for_account(&self, account_id: i32) -> Result<u64, DbErr> {
        let result = SessionTokens::delete_many()
            .filter(session_tokens::Column::AccountId.eq(account_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn count_for_account(&self, account_id: i32) -> Result<u64, DbErr> {
        SessionTokens::find()
            .filter(session_tokens::Column::AccountId.eq(account_id))
            .count(&self.conn)
            .await
    }

    /// Removes tokens whose expiry lies before `now` (RFC 3339, UTC).
    pub async fn delete_expired(&self, now: &str) -> Result<u64, DbErr> {
        let result = SessionTokens::delete_many()
            .filter(session_tokens::Column::ExpiresAt.lt(now))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
