//! Smoke tests for link storage: image cleanup and sealed-column integrity.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use geoportal::config::Config;
use geoportal::entities::links;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

async fn spawn_app() -> (Arc<geoportal::api::AppState>, Router, PathBuf) {
    let db_path =
        std::env::temp_dir().join(format!("geoportal-smoke-test-{}.db", uuid::Uuid::new_v4()));
    let images_dir =
        std::env::temp_dir().join(format!("geoportal-smoke-images-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&images_dir).unwrap();

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.general.images_path = images_dir.display().to_string();
    config.security.secret_key = Some("smoke-test-secret-key-0123456789abcdef".to_string());

    let state = geoportal::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    let router = geoportal::api::router(state.clone()).await;
    (state, router, images_dir)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_link_images_are_removed_when_replaced_or_deleted() {
    let (_state, app, images_dir) = spawn_app().await;
    let token = admin_token(&app).await;

    std::fs::write(images_dir.join("maps.png"), b"png").unwrap();
    std::fs::write(images_dir.join("maps-v2.png"), b"png").unwrap();

    let (status, body) = call(
        &app,
        "POST",
        "/api/links",
        Some(&token),
        Some(json!({ "name": "Maps", "address": "https://maps.example.org", "image": "maps.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/links/{id}"),
        Some(&token),
        Some(json!({ "name": "Maps", "address": "https://maps.example.org", "image": "maps-v2.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["image"], "maps-v2.png");
    assert!(!images_dir.join("maps.png").exists());
    assert!(images_dir.join("maps-v2.png").exists());

    let (status, _) = call(&app, "DELETE", &format!("/api/links/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!images_dir.join("maps-v2.png").exists());

    let (status, _) = call(&app, "GET", &format!("/api/links/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&images_dir).ok();
}

#[tokio::test]
async fn test_shared_link_image_survives_until_last_reference_is_gone() {
    let (_state, app, images_dir) = spawn_app().await;
    let token = admin_token(&app).await;

    std::fs::write(images_dir.join("logo.png"), b"png").unwrap();

    let mut ids = Vec::new();
    for (name, address) in [
        ("Maps", "https://maps.example.org"),
        ("Trails", "https://trails.example.org"),
        ("Parcels", "https://parcels.example.org"),
    ] {
        let (status, body) = call(
            &app,
            "POST",
            "/api/links",
            Some(&token),
            Some(json!({ "name": name, "address": address, "image": "logo.png" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, _) = call(&app, "DELETE", &format!("/api/links/{}", ids[0]), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(images_dir.join("logo.png").exists());

    let (status, _) = call(
        &app,
        "PUT",
        &format!("/api/links/{}", ids[1]),
        Some(&token),
        Some(json!({ "name": "Trails", "address": "https://trails.example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(images_dir.join("logo.png").exists());

    let (status, _) = call(&app, "DELETE", &format!("/api/links/{}", ids[2]), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!images_dir.join("logo.png").exists());

    std::fs::remove_dir_all(&images_dir).ok();
}

#[tokio::test]
async fn test_link_image_path_traversal_is_rejected() {
    let (_state, app, _images_dir) = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/links",
        Some(&token),
        Some(json!({ "name": "Maps", "address": "https://maps.example.org", "image": "../config.toml" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_tampered_ciphertext_is_a_generic_internal_error() {
    let (state, app, _images_dir) = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/links",
        Some(&token),
        Some(json!({ "name": "Maps", "address": "https://maps.example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = i32::try_from(body["data"]["id"].as_i64().unwrap()).unwrap();

    let stored = links::Entity::find_by_id(id)
        .one(&state.store().conn)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.name_cipher, "Maps");
    assert!(!stored.address_cipher.contains("maps.example.org"));

    let mut tampered = stored.name_cipher.clone().into_bytes();
    let last = tampered.len() - 2;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };

    let mut active: links::ActiveModel = stored.into();
    active.name_cipher = Set(String::from_utf8(tampered).unwrap());
    active.update(&state.store().conn).await.unwrap();

    let (status, body) = call(&app, "GET", &format!("/api/links/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["error"], "An internal error occurred");
}
