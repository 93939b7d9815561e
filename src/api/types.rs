use serde::{Deserialize, Serialize};

use crate::domain::Role;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: Some(code),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSelfRequest {
    pub version: i32,
    pub username: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

const fn default_role() -> Role {
    Role::User
}

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub version: i32,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Body or query carrying only the caller's last-read account version.
#[derive(Debug, Deserialize)]
pub struct VersionRequest {
    pub version: i32,
}

#[derive(Debug, Deserialize)]
pub struct DepartmentRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub account_id: i32,
    pub version: i32,
}

#[derive(Debug, Deserialize)]
pub struct AddLinkRequest {
    pub link_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub image: Option<String>,
}
