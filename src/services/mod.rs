pub mod credentials;
pub mod error;
pub mod image;
pub mod lifecycle;

pub use error::ServiceError;
pub use image::ImageService;
pub use lifecycle::{AccountLifecycle, AccountMutation};

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountService, AccountUpdate, AccountView, NewAccount, SelfUpdate};
pub use account_service_impl::SeaOrmAccountService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthService, SessionGrant};
pub use auth_service_impl::SeaOrmAuthService;

pub mod department_service;
pub mod department_service_impl;
pub use department_service::{DepartmentService, DepartmentView};
pub use department_service_impl::SeaOrmDepartmentService;

pub mod link_service;
pub mod link_service_impl;
pub use link_service::{LinkInput, LinkService, LinkView};
pub use link_service_impl::SeaOrmLinkService;
