use std::path::Path;

use super::ApiError;
use crate::constants::limits::{
    DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS, PASSWORD_MIN_CHARS, USERNAME_MAX_CHARS,
    USERNAME_MIN_CHARS,
};

pub fn validate_id(kind: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {kind} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len) {
        return Err(ApiError::validation(format!(
            "Username must be between {USERNAME_MIN_CHARS} and {USERNAME_MAX_CHARS} characters"
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(username)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ApiError::validation(format!(
            "Password must be at least {PASSWORD_MIN_CHARS} characters"
        )));
    }
    Ok(password)
}

/// Department and link names, returned trimmed.
pub fn validate_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Name cannot be empty"));
    }
    if trimmed.chars().count() > NAME_MAX_CHARS {
        return Err(ApiError::validation(format!(
            "Name must be {NAME_MAX_CHARS} characters or less"
        )));
    }
    Ok(trimmed)
}

pub fn validate_address(address: &str) -> Result<String, ApiError> {
    let trimmed = address.trim();
    let url = url::Url::parse(trimmed)
        .map_err(|e| ApiError::validation(format!("Invalid address '{trimmed}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::validation(
            "Address must be an http or https URL",
        ));
    }

    Ok(trimmed.to_string())
}

/// Blank descriptions are treated as absent.
pub fn validate_description(description: Option<String>) -> Result<Option<String>, ApiError> {
    let Some(description) = description.map(|d| d.trim().to_string()) else {
        return Ok(None);
    };

    if description.is_empty() {
        return Ok(None);
    }
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ApiError::validation(format!(
            "Description must be {DESCRIPTION_MAX_CHARS} characters or less"
        )));
    }
    Ok(Some(description))
}

pub fn validate_image(image: Option<String>) -> Result<Option<String>, ApiError> {
    let Some(image) = image.filter(|i| !i.trim().is_empty()) else {
        return Ok(None);
    };

    let bare = Path::new(&image)
        .file_name()
        .is_some_and(|name| name == image.as_str());

    if !bare || image == ".." || image.contains('\\') {
        return Err(ApiError::validation(
            "Image must be a bare filename without path separators",
        ));
    }

    Ok(Some(image))
}
