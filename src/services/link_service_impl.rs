//! `SeaORM` implementation of the `LinkService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::crypto::{CodecError, FieldCipher};
use crate::db::{LinkRecord, Store};
use crate::domain::Role;
use crate::domain::authz::{self, Principal};
use crate::entities::links;
use crate::services::ImageService;
use crate::services::ServiceError;
use crate::services::link_service::{LinkInput, LinkService, LinkView};

pub struct SeaOrmLinkService {
    store: Store,
    cipher: Arc<FieldCipher>,
    images: Arc<ImageService>,
}

impl SeaOrmLinkService {
    #[must_use]
    pub const fn new(store: Store, cipher: Arc<FieldCipher>, images: Arc<ImageService>) -> Self {
        Self {
            store,
            cipher,
            images,
        }
    }

    async fn load(&self, id: i32) -> Result<links::Model, ServiceError> {
        self.store
            .links()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Link", id))
    }

    /// Seals the input and rejects fingerprints owned by another link.
    async fn seal(
        &self,
        input: LinkInput,
        owner: Option<i32>,
    ) -> Result<LinkRecord, ServiceError> {
        let seal_err =
            |e: CodecError| ServiceError::Internal(format!("Failed to seal link field: {e}"));
        let name = self.cipher.encode(&input.name).map_err(seal_err)?;
        let address = self.cipher.encode(&input.address).map_err(seal_err)?;

        let repo = self.store.links();

        if let Some(existing) = repo.find_by_name_fingerprint(&name.fingerprint).await?
            && Some(existing.id) != owner
        {
            return Err(ServiceError::conflict(format!(
                "A link named '{}' already exists",
                input.name
            )));
        }

        if let Some(existing) = repo.find_by_address_fingerprint(&address.fingerprint).await?
            && Some(existing.id) != owner
        {
            return Err(ServiceError::conflict(format!(
                "A link with address '{}' already exists",
                input.address
            )));
        }

        Ok(LinkRecord {
            name,
            address,
            description: input.description.filter(|d| !d.is_empty()),
            image: input.image.filter(|i| !i.is_empty()),
        })
    }

    /// Removes the image file once `former_owner` no longer uses it, unless
    /// another link still points at the same filename.
    async fn release_image(&self, image: &str, former_owner: i32) {
        match self.store.links().image_in_use(image, former_owner).await {
            Ok(false) => self.images.remove(image).await,
            Ok(true) => debug!(image, "Image still referenced by another link; keeping file"),
            Err(e) => warn!(image, error = %e, "Could not check image references; keeping file"),
        }
    }
}

#[async_trait]
impl LinkService for SeaOrmLinkService {
    async fn list(&self) -> Result<Vec<LinkView>, ServiceError> {
        self.store
            .links()
            .list()
            .await?
            .into_iter()
            .map(|model| LinkView::decode(&self.cipher, model))
            .collect()
    }

    async fn get(&self, id: i32) -> Result<LinkView, ServiceError> {
        let model = self.load(id).await?;
        LinkView::decode(&self.cipher, model)
    }

    async fn create(&self, actor: Principal, input: LinkInput) -> Result<LinkView, ServiceError> {
        authz::require_role(actor, Role::Admin)?;

        let record = self.seal(input, None).await?;
        let model = self.store.links().create(record).await?;

        info!(link_id = model.id, created_by = actor.id, "Link created");
        LinkView::decode(&self.cipher, model)
    }

    async fn update(
        &self,
        actor: Principal,
        id: i32,
        input: LinkInput,
    ) -> Result<LinkView, ServiceError> {
        authz::require_role(actor, Role::Admin)?;

        let existing = self.load(id).await?;
        let previous_image = existing.image.clone();

        let record = self.seal(input, Some(id)).await?;
        let model = self.store.links().update(existing, record).await?;

        if let Some(old) = previous_image
            && model.image.as_deref() != Some(old.as_str())
        {
            self.release_image(&old, id).await;
        }

        info!(link_id = id, updated_by = actor.id, "Link updated");
        LinkView::decode(&self.cipher, model)
    }

    async fn delete(&self, actor: Principal, id: i32) -> Result<(), ServiceError> {
        authz::require_role(actor, Role::Admin)?;

        let existing = self.load(id).await?;
        if !self.store.links().delete(id).await? {
            return Err(ServiceError::not_found("Link", id));
        }

        if let Some(image) = existing.image {
            self.release_image(&image, id).await;
        }

        info!(link_id = id, deleted_by = actor.id, "Link deleted");
        Ok(())
    }
}
