use anyhow::Context;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::crypto::FieldCipher;
use crate::db::Store;
use crate::services::{
    AccountService, AuthService, DepartmentService, ImageService, LinkService,
    SeaOrmAccountService, SeaOrmAuthService, SeaOrmDepartmentService, SeaOrmLinkService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub account_service: Arc<dyn AccountService>,

    pub auth_service: Arc<dyn AuthService>,

    pub department_service: Arc<dyn DepartmentService>,

    pub link_service: Arc<dyn LinkService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let cipher = Arc::new(
            FieldCipher::from_secret(config.secret_key()?)
                .context("Failed to initialize field cipher")?,
        );

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let image_service = Arc::new(ImageService::new(&config.general.images_path));
        let security = config.security.clone();

        let account_service = Arc::new(SeaOrmAccountService::new(store.clone(), security.clone()))
            as Arc<dyn AccountService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            cipher.clone(),
            security,
        )) as Arc<dyn AuthService>;

        let department_service = Arc::new(SeaOrmDepartmentService::new(
            store.clone(),
            cipher.clone(),
        )) as Arc<dyn DepartmentService>;

        let link_service = Arc::new(SeaOrmLinkService::new(
            store.clone(),
            cipher,
            image_service,
        )) as Arc<dyn LinkService>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            account_service,
            auth_service,
            department_service,
            link_service,
        })
    }
}
