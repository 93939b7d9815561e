//! Versioned account mutation pipeline.
//!
//! Every write to an account row runs the same steps in order:
//! version check, apply, version bump (one conditional statement), then,
//! after commit, session revocation when the mutation is direct. Association
//! changes use [`MutationKind::RelationshipOnly`] so the revocation step is
//! skipped while the version still moves.

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::{debug, info, warn};

use crate::db::{AccountChanges, AccountRepository, Store, VersionedUpdate};
use crate::domain::MutationKind;
use crate::entities::accounts;

use super::ServiceError;

#[derive(Debug, Clone)]
pub struct AccountMutation {
    pub account_id: i32,
    /// Version the caller last read.
    pub expected_version: i32,
    pub changes: AccountChanges,
    pub kind: MutationKind,
}

impl AccountMutation {
    #[must_use]
    pub const fn direct(account_id: i32, expected_version: i32, changes: AccountChanges) -> Self {
        Self {
            account_id,
            expected_version,
            changes,
            kind: MutationKind::Direct,
        }
    }

    /// Version bump with no column changes.
    #[must_use]
    pub fn touch(account_id: i32, expected_version: i32) -> Self {
        Self {
            account_id,
            expected_version,
            changes: AccountChanges::default(),
            kind: MutationKind::RelationshipOnly,
        }
    }
}

#[derive(Clone)]
pub struct AccountLifecycle {
    store: Store,
}

impl AccountLifecycle {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Version-checked write on `conn`, which may be an open transaction.
    pub async fn apply<C: ConnectionTrait>(
        conn: &C,
        mutation: &AccountMutation,
    ) -> Result<accounts::Model, ServiceError> {
        match AccountRepository::update_versioned(
            conn,
            mutation.account_id,
            mutation.expected_version,
            &mutation.changes,
        )
        .await?
        {
            VersionedUpdate::Applied(account) => Ok(account),
            VersionedUpdate::Stale(current) => {
                debug!(
                    account_id = current.id,
                    expected = mutation.expected_version,
                    current = current.version,
                    "Rejected stale account version"
                );
                Err(ServiceError::stale_version(current.id, current.version))
            }
            VersionedUpdate::Missing => {
                Err(ServiceError::not_found("Account", mutation.account_id))
            }
        }
    }

    /// Post-commit hook. Revocation is best-effort: failures are logged and
    /// never undo or fail the committed mutation.
    pub async fn after_commit(&self, account: &accounts::Model, kind: MutationKind) {
        if !kind.revokes_sessions() {
            return;
        }

        match self.store.sessions().delete_for_account(account.id).await {
            Ok(revoked) => info!(
                account_id = account.id,
                version = account.version,
                revoked,
                "Revoked session tokens after account change"
            ),
            Err(e) => warn!(
                account_id = account.id,
                error = %e,
                "Failed to revoke session tokens after account change"
            ),
        }
    }

    pub async fn run(&self, mutation: AccountMutation) -> Result<accounts::Model, ServiceError> {
        let account = if self.store.conn.support_returning() {
            Self::apply(&self.store.conn, &mutation).await?
        } else {
            let txn = self.store.conn.begin().await?;
            let account = Self::apply(&txn, &mutation).await?;
            txn.commit().await?;
            account
        };

        self.after_commit(&account, mutation.kind).await;
        Ok(account)
    }
}
