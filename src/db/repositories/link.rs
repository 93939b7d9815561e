use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::crypto::SealedField;
use crate::entities::{links, prelude::*};

/// Already-sealed column values for a link row.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub name: SealedField,
    pub address: SealedField,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub struct LinkRepository {
    conn: DatabaseConnection,
}

impl LinkRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<links::Model>, DbErr> {
        Links::find()
            .order_by_asc(links::Column::Id)
            .all(&self.conn)
            .await
    }

    pub async fn get(&self, id: i32) -> Result<Option<links::Model>, DbErr> {
        Links::find_by_id(id).one(&self.conn).await
    }

    pub async fn find_by_name_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<links::Model>, DbErr> {
        Links::find()
            .filter(links::Column::NameFingerprint.eq(fingerprint))
            .one(&self.conn)
            .await
    }

    pub async fn find_by_address_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<links::Model>, DbErr> {
        Links::find()
            .filter(links::Column::AddressFingerprint.eq(fingerprint))
            .one(&self.conn)
            .await
    }

    pub async fn create(&self, record: LinkRecord) -> Result<links::Model, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        links::ActiveModel {
            name_cipher: Set(record.name.ciphertext),
            name_fingerprint: Set(record.name.fingerprint),
            address_cipher: Set(record.address.ciphertext),
            address_fingerprint: Set(record.address.fingerprint),
            description: Set(record.description),
            image: Set(record.image),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
    }

    pub async fn update(
        &self,
        link: links::Model,
        record: LinkRecord,
    ) -> Result<links::Model, DbErr> {
        let mut active: links::ActiveModel = link.into();
        active.name_cipher = Set(record.name.ciphertext);
        active.name_fingerprint = Set(record.name.fingerprint);
        active.address_cipher = Set(record.address.ciphertext);
        active.address_fingerprint = Set(record.address.fingerprint);
        active.description = Set(record.description);
        active.image = Set(record.image);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await
    }

    /// Whether any link other than `except` still references `image`.
    pub async fn image_in_use(&self, image: &str, except: i32) -> Result<bool, DbErr> {
        let count = Links::find()
            .filter(links::Column::Image.eq(image))
            .filter(links::Column::Id.ne(except))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = Links::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
