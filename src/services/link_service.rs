//! Domain service for external links.
//!
//! Link names and addresses are stored sealed; lookups and uniqueness go
//! through their fingerprints.

use serde::Serialize;

use crate::crypto::FieldCipher;
use crate::domain::authz::Principal;
use crate::entities::links;

use super::ServiceError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LinkView {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl LinkView {
    /// Decodes the sealed columns of `model`.
    pub fn decode(cipher: &FieldCipher, model: links::Model) -> Result<Self, ServiceError> {
        let name = cipher
            .decode(&model.name_cipher)
            .map_err(|e| ServiceError::decode("link", model.id, e))?;
        let address = cipher
            .decode(&model.address_cipher)
            .map_err(|e| ServiceError::decode("link", model.id, e))?;

        Ok(Self {
            id: model.id,
            name,
            address,
            description: model.description,
            image: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Create or full-replace payload for a link.
#[derive(Debug, Clone)]
pub struct LinkInput {
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[async_trait::async_trait]
pub trait LinkService: Send + Sync {
    async fn list(&self) -> Result<Vec<LinkView>, ServiceError>;

    async fn get(&self, id: i32) -> Result<LinkView, ServiceError>;

    /// # Errors
    ///
    /// Returns [`ServiceError::UniquenessConflict`] if the name or address is
    /// already used by another link.
    async fn create(&self, actor: Principal, input: LinkInput) -> Result<LinkView, ServiceError>;

    async fn update(
        &self,
        actor: Principal,
        id: i32,
        input: LinkInput,
    ) -> Result<LinkView, ServiceError>;

    /// Deletes the link, its department associations and its image file.
    async fn delete(&self, actor: Principal, id: i32) -> Result<(), ServiceError>;
}
