use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use geoportal::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-key-0123456789abcdef";

/// Bootstrap credentials seeded by the initial migration.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "password";

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("geoportal-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}?mode=rwc", db_path.display());
    config.general.images_path = std::env::temp_dir()
        .join(format!("geoportal-images-{}", uuid::Uuid::new_v4()))
        .display()
        .to_string();
    config.security.secret_key = Some(TEST_SECRET.to_string());

    let state = geoportal::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    geoportal::api::router(state).await
}

async fn send(
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
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_account(app: &Router, token: &str, username: &str, role: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/accounts",
        Some(token),
        Some(json!({ "username": username, "password": "initial-pass", "role": role })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create account failed: {body}");
    body["data"].clone()
}

async fn create_department(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/departments",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create department failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/accounts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "unauthorized");

    let (status, _) = send(&app, "GET", "/api/accounts", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/public/links", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(&app, "GET", "/api/system/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "alive");

    let (status, body) = send(&app, "GET", "/api/system/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["checks"]["database"], true);
}

#[tokio::test]
async fn test_login_me_refresh_and_logout() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USERNAME, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["account"]["role"], "SUPERADMIN");
    assert_eq!(body["data"]["account"]["must_change_password"], true);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 64);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], ADMIN_USERNAME);

    let (status, body) = send(&app, "POST", "/api/auth/refresh", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let rotated = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(rotated, token);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&rotated), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&rotated), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_parks_department_publishes_maps_link() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let parks = create_department(&app, &token, "Parks").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/links",
        Some(&token),
        Some(json!({
            "name": "Maps",
            "address": "https://maps.example.org/viewer",
            "description": "City map viewer"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let maps = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/departments/{parks}/links"),
        Some(&token),
        Some(json!({ "link_id": maps })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Parks");
    assert_eq!(body["data"]["links"][0]["name"], "Maps");
    assert_eq!(body["data"]["links"][0]["address"], "https://maps.example.org/viewer");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/departments/{parks}/links"),
        Some(&token),
        Some(json!({ "link_id": maps })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "uniqueness_conflict");

    let (status, body) = send(&app, "GET", "/api/public/links", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Maps");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/departments/{parks}/links/{maps}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["links"], json!([]));

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/departments/{parks}/links/{maps}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    // Deleting the department leaves the link in place
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/departments/{parks}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/api/links/{maps}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Maps");
}

#[tokio::test]
async fn test_duplicate_link_fields_are_uniqueness_conflicts() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/links",
        Some(&token),
        Some(json!({ "name": "Maps", "address": "https://maps.example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/links",
        Some(&token),
        Some(json!({ "name": "Maps", "address": "https://other.example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "uniqueness_conflict");

    let (status, body) = send(
        &app,
        "POST",
        "/api/links",
        Some(&token),
        Some(json!({ "name": "Catalogue", "address": "https://maps.example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "uniqueness_conflict");

    let (status, body) = send(
        &app,
        "POST",
        "/api/links",
        Some(&token),
        Some(json!({ "name": "Catalogue", "address": "ftp://maps.example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_admin_update_bumps_version_and_rejects_stale_retry() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let jane = create_account(&app, &admin, "jane", "USER").await;
    let jane_id = jane["id"].as_i64().unwrap();
    assert_eq!(jane["version"], 0);
    assert_eq!(jane["must_change_password"], true);

    for (version, username) in [(0, "jane.d"), (1, "jane.doe"), (2, "jane")] {
        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/accounts/{jane_id}"),
            Some(&admin),
            Some(json!({ "version": version, "username": username })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["version"], version + 1);
    }

    let jane_token = login(&app, "jane", "initial-pass").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/accounts/{jane_id}"),
        Some(&admin),
        Some(json!({ "version": 3, "username": "jane.doe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], 4);
    assert_eq!(body["data"]["username"], "jane.doe");

    // Direct mutation revokes every session of the account
    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&jane_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/accounts/{jane_id}"),
        Some(&admin),
        Some(json!({ "version": 3, "username": "someone-else" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "version_conflict");

    let (_, body) = send(&app, "GET", &format!("/api/accounts/{jane_id}"), Some(&admin), None).await;
    assert_eq!(body["data"]["version"], 4);
    assert_eq!(body["data"]["username"], "jane.doe");
}

#[tokio::test]
async fn test_force_password_change_round_trip() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let jane = create_account(&app, &admin, "jane", "USER").await;
    let uri = format!("/api/accounts/{}/force-password-change", jane["id"]);

    let (status, body) = send(&app, "DELETE", &uri, Some(&admin), Some(json!({ "version": 0 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["must_change_password"], false);
    assert_eq!(body["data"]["version"], 1);

    let (status, body) = send(&app, "POST", &uri, Some(&admin), Some(json!({ "version": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["must_change_password"], true);
    assert_eq!(body["data"]["version"], 2);

    let (status, _) = send(&app, "POST", &uri, Some(&admin), Some(json!({ "version": 1 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_bootstrap_superadmin_cannot_be_deleted_or_reroled() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let (_, me) = send(&app, "GET", "/api/auth/me", Some(&admin), None).await;
    let root_id = me["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/accounts/{root_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/accounts/{root_id}"),
        Some(&admin),
        Some(json!({ "version": 0, "role": "ADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    create_account(&app, &admin, "boss", "ADMIN").await;
    let boss = login(&app, "boss", "initial-pass").await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/accounts/{root_id}"),
        Some(&boss),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/accounts",
        Some(&boss),
        Some(json!({ "username": "usurper", "password": "initial-pass", "role": "SUPERADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let jane = create_account(&app, &boss, "jane", "USER").await;
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/accounts/{}", jane["id"]),
        Some(&admin),
        Some(json!({ "version": 0, "role": "SUPERADMIN" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Root account is untouched by the rejected attempts
    let (_, body) = send(&app, "GET", &format!("/api/accounts/{root_id}"), Some(&admin), None).await;
    assert_eq!(body["data"]["role"], "SUPERADMIN");
    assert_eq!(body["data"]["version"], 0);
}

#[tokio::test]
async fn test_plain_user_cannot_administer() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    create_account(&app, &admin, "jane", "USER").await;
    let jane = login(&app, "jane", "initial-pass").await;

    let (status, _) = send(&app, "GET", "/api/accounts", Some(&jane), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/api/departments",
        Some(&jane),
        Some(json!({ "name": "Parks" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/departments", Some(&jane), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_membership_touch_bumps_version_and_keeps_sessions() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let jane = create_account(&app, &admin, "jane", "USER").await;
    let jane_id = jane["id"].as_i64().unwrap();
    let jane_token = login(&app, "jane", "initial-pass").await;

    let parks = create_department(&app, &admin, "Parks").await;
    let members = format!("/api/departments/{parks}/accounts");

    let (status, body) = send(
        &app,
        "POST",
        &members,
        Some(&admin),
        Some(json!({ "account_id": jane_id, "version": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["version"], 1);
    assert_eq!(body["data"]["department_ids"], json!([parks]));

    // Relationship-only touch leaves sessions alone
    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&jane_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], 1);

    let (status, body) = send(
        &app,
        "POST",
        &members,
        Some(&admin),
        Some(json!({ "account_id": jane_id, "version": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "uniqueness_conflict");

    let (status, body) = send(
        &app,
        "POST",
        &members,
        Some(&admin),
        Some(json!({ "account_id": jane_id, "version": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "version_conflict");

    // Rolled back: the failed add did not move the version
    let (_, body) = send(&app, "GET", &format!("/api/accounts/{jane_id}"), Some(&admin), None).await;
    assert_eq!(body["data"]["version"], 1);

    let (_, body) = send(&app, "GET", &format!("/api/departments/{parks}"), Some(&admin), None).await;
    assert_eq!(body["data"]["account_ids"], json!([jane_id]));

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("{members}/{jane_id}?version=1"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["data"]["department_ids"], json!([]));

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("{members}/{jane_id}?version=2"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/auth/me", Some(&jane_token), None).await;
    assert_eq!(body["data"]["version"], 2);

    let (status, body) = send(
        &app,
        "POST",
        &members,
        Some(&admin),
        Some(json!({ "account_id": 9999, "version": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn test_self_update_requires_current_password_and_clears_flag() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    create_account(&app, &admin, "jane", "USER").await;
    let jane = login(&app, "jane", "initial-pass").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/me",
        Some(&jane),
        Some(json!({
            "version": 0,
            "current_password": "wrong-pass",
            "new_password": "brand-new-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/me",
        Some(&jane),
        Some(json!({ "version": 0, "current_password": "initial-pass", "new_password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/auth/me",
        Some(&jane),
        Some(json!({
            "version": 0,
            "current_password": "initial-pass",
            "new_password": "brand-new-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["must_change_password"], false);
    assert_eq!(body["data"]["version"], 1);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&jane), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "jane", "password": "initial-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    login(&app, "jane", "brand-new-pass").await;
}

#[tokio::test]
async fn test_department_delete_touches_members_and_keeps_sessions() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let jane_id = create_account(&app, &admin, "jane", "USER").await["id"]
        .as_i64()
        .unwrap();
    let omar_id = create_account(&app, &admin, "omar", "USER").await["id"]
        .as_i64()
        .unwrap();
    let jane_token = login(&app, "jane", "initial-pass").await;

    let parks = create_department(&app, &admin, "Parks").await;
    let roads = create_department(&app, &admin, "Roads").await;

    for (department, account) in [(parks, jane_id), (parks, omar_id), (roads, jane_id)] {
        let (_, current) =
            send(&app, "GET", &format!("/api/accounts/{account}"), Some(&admin), None).await;
        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/departments/{department}/accounts"),
            Some(&admin),
            Some(json!({ "account_id": account, "version": current["data"]["version"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (_, body) = send(&app, "GET", &format!("/api/accounts/{jane_id}"), Some(&admin), None).await;
    assert_eq!(body["data"]["version"], 2);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/departments/{parks}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Every dropped membership row moves its account's version
    let (_, body) = send(&app, "GET", &format!("/api/accounts/{jane_id}"), Some(&admin), None).await;
    assert_eq!(body["data"]["version"], 3);
    assert_eq!(body["data"]["department_ids"], json!([roads]));

    let (_, body) = send(&app, "GET", &format!("/api/accounts/{omar_id}"), Some(&admin), None).await;
    assert_eq!(body["data"]["version"], 2);
    assert_eq!(body["data"]["department_ids"], json!([]));

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&jane_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], 3);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/departments/{parks}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_account_delete_drops_sessions_and_memberships() {
    let app = spawn_app().await;
    let admin = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let jane_id = create_account(&app, &admin, "jane", "USER").await["id"]
        .as_i64()
        .unwrap();
    let jane_token = login(&app, "jane", "initial-pass").await;

    let parks = create_department(&app, &admin, "Parks").await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/departments/{parks}/accounts"),
        Some(&admin),
        Some(json!({ "account_id": jane_id, "version": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/accounts/{jane_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&jane_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) =
        send(&app, "GET", &format!("/api/departments/{parks}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["account_ids"], json!([]));

    let (status, _) =
        send(&app, "GET", &format!("/api/accounts/{jane_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_delete_drops_department_associations() {
    let app = spawn_app().await;
    let token = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let parks = create_department(&app, &token, "Parks").await;

    let mut link_ids = Vec::new();
    for (name, address) in [
        ("Maps", "https://maps.example.org/viewer"),
        ("Trails", "https://trails.example.org"),
    ] {
        let (status, body) = send(
            &app,
            "POST",
            "/api/links",
            Some(&token),
            Some(json!({ "name": name, "address": address })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/departments/{parks}/links"),
            Some(&token),
            Some(json!({ "link_id": id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        link_ids.push(id);
    }

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/links/{}", link_ids[0]),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        send(&app, "GET", &format!("/api/departments/{parks}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let links = body["data"]["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["id"], link_ids[1]);
    assert_eq!(links[0]["name"], "Trails");
}
