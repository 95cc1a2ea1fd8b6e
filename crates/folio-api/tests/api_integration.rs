use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use secrecy::SecretString;
use serde_json::{json, Value};

use folio_api::{create_router, AppState};
use folio_core::{
    AuthConfig, CorsConfig, DatabaseBackend, DatabaseConfig, Environment, ServerConfig, Settings,
};
use folio_store::MemoryStore;

const ADMIN_PASSWORD: &str = "integration-admin-pw";

fn test_settings() -> Settings {
    Settings {
        environment: Environment::Development,
        server: ServerConfig::default(),
        database: DatabaseConfig {
            backend: DatabaseBackend::Memory,
            ..DatabaseConfig::default()
        },
        auth: AuthConfig {
            jwt_secret: SecretString::from("integration-test-secret-0123456789abcdef"),
            jwt_expiry_hours: 168,
            admin_username: Some("admin".to_string()),
            admin_password: Some(SecretString::from(ADMIN_PASSWORD)),
        },
        cors: CorsConfig::default(),
    }
}

async fn test_server() -> TestServer {
    let state = AppState::with_store(test_settings(), Arc::new(MemoryStore::new()));
    state.seed_admin().await.unwrap();
    TestServer::new(create_router(state)).unwrap()
}

async fn login(server: &TestServer) -> String {
    let res = server
        .post("/api/auth/login")
        .json(&json!({ "username": "admin", "password": ADMIN_PASSWORD }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    res.json::<Value>()["token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[tokio::test]
async fn health_reports_healthy() {
    let server = test_server().await;
    let res = server.get("/api/health").await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let body = res.json::<Value>();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["status"], json!("healthy"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn public_lists_start_empty() {
    let server = test_server().await;
    for path in ["/api/projects", "/api/skills", "/api/experiences", "/api/socials"] {
        let res = server.get(path).await;
        assert_eq!(res.status_code(), StatusCode::OK);
        let body = res.json::<Value>();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"], json!([]));
    }
}

#[tokio::test]
async fn login_failure_is_uniform() {
    let server = test_server().await;

    let wrong_user = server
        .post("/api/auth/login")
        .json(&json!({ "username": "nobody", "password": "whatever123" }))
        .await;
    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({ "username": "admin", "password": "whatever123" }))
        .await;

    for res in [wrong_user, wrong_password] {
        assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
        let body = res.json::<Value>();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Invalid credentials"));
    }
}

#[tokio::test]
async fn login_sets_http_only_cookie() {
    let server = test_server().await;
    let res = server
        .post("/api/auth/login")
        .json(&json!({ "username": "admin", "password": ADMIN_PASSWORD }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let body = res.json::<Value>();
    assert_eq!(body["message"], json!("Login successful"));
    assert_eq!(body["user"]["username"], json!("admin"));
    assert!(body["token"].is_string());

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn cookie_token_authenticates() {
    let server = test_server().await;
    let token = login(&server).await;

    let res = server
        .get("/api/auth/me")
        .add_header(header::COOKIE, format!("token={token}"))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["user"]["username"], json!("admin"));
}

#[tokio::test]
async fn verify_confirms_valid_token() {
    let server = test_server().await;
    let token = login(&server).await;

    let res = server
        .post("/api/auth/verify")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body = res.json::<Value>();
    assert_eq!(body["valid"], json!(true));
    assert_eq!(body["user"]["username"], json!("admin"));
}

#[tokio::test]
async fn protected_route_requires_token() {
    let server = test_server().await;
    let res = server
        .post("/api/projects")
        .json(&json!({ "title": "No auth" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>();
    assert_eq!(body["error"], json!("Unauthorized"));
    assert_eq!(body["message"], json!("Authentication required. Please log in."));
}

#[tokio::test]
async fn garbage_token_is_forbidden() {
    let server = test_server().await;
    let res = server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, bearer("not-a-real-token"))
        .await;
    assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<Value>()["error"], json!("Invalid token"));
}

#[tokio::test]
async fn project_create_sanitizes_input() {
    let server = test_server().await;
    let token = login(&server).await;

    let res = server
        .post("/api/projects")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "title": "  <script>alert(1)</script>Portfolio  ",
            "subtitle": "<b>bold</b> claim",
            "stack": ["Rust", "<i>Axum</i>"],
            "link": "https://example.com/code",
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);

    let body = res.json::<Value>();
    assert_eq!(body["message"], json!("Project created successfully"));
    assert_eq!(body["data"]["title"], json!("alert(1)Portfolio"));
    assert_eq!(body["data"]["subtitle"], json!("bold claim"));
    assert_eq!(body["data"]["stack"], json!(["Rust", "Axum"]));

    let id = body["data"]["id"].as_str().unwrap();
    let fetched = server.get(&format!("/api/projects/{id}")).await;
    assert_eq!(fetched.status_code(), StatusCode::OK);
    assert_eq!(fetched.json::<Value>()["data"]["title"], json!("alert(1)Portfolio"));
}

#[tokio::test]
async fn unknown_body_fields_rejected() {
    let server = test_server().await;
    let token = login(&server).await;

    let res = server
        .post("/api/projects")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "title": "x", "evil": true }))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["error"], json!("Validation failed"));
}

#[tokio::test]
async fn skill_validation_enforces_bounds() {
    let server = test_server().await;
    let token = login(&server).await;

    let res = server
        .post("/api/skills")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "title": "Systems", "progress": 150 }))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>();
    assert_eq!(body["details"][0]["field"], json!("progress"));

    // totalSkills arrives camelCased from the dashboard.
    let res = server
        .post("/api/skills")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "title": "Systems", "progress": 80, "totalSkills": 12 }))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    assert_eq!(res.json::<Value>()["data"]["total_skills"], json!(12));
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let server = test_server().await;
    let token = login(&server).await;

    let created = server
        .post("/api/experiences")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "company": "Initech",
            "role": "Engineer",
            "stack": ["Rust"],
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let id = created.json::<Value>()["data"]["id"].as_str().unwrap().to_string();

    let empty = server
        .put(&format!("/api/experiences/{id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({}))
        .await;
    assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(empty.json::<Value>()["error"], json!("No fields to update"));

    let updated = server
        .put(&format!("/api/experiences/{id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "role": "Staff Engineer" }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    let body = updated.json::<Value>();
    assert_eq!(body["data"]["role"], json!("Staff Engineer"));
    assert_eq!(body["data"]["company"], json!("Initech"));
    assert_eq!(body["data"]["stack"], json!(["Rust"]));
}

#[tokio::test]
async fn delete_then_not_found() {
    let server = test_server().await;
    let token = login(&server).await;

    let created = server
        .post("/api/projects")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "title": "Short lived" }))
        .await;
    let id = created.json::<Value>()["data"]["id"].as_str().unwrap().to_string();

    let deleted = server
        .delete(&format!("/api/projects/{id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let again = server
        .delete(&format!("/api/projects/{id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(again.json::<Value>()["error"], json!("Project not found"));
}

#[tokio::test]
async fn malformed_id_is_rejected() {
    let server = test_server().await;
    let res = server.get("/api/projects/not-a-uuid").await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>()["details"][0]["message"], json!("Invalid ID format"));
}

#[tokio::test]
async fn socials_upsert_creates_then_updates() {
    let server = test_server().await;
    let token = login(&server).await;

    let first = server
        .put("/api/socials/github")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "href": "https://github.com/dev", "label": "GitHub" }))
        .await;
    assert_eq!(first.status_code(), StatusCode::CREATED);
    assert_eq!(first.json::<Value>()["data"]["platform"], json!("github"));

    let second = server
        .put("/api/socials/github")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "href": "https://github.com/dev2", "label": "GH" }))
        .await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(second.json::<Value>()["data"]["label"], json!("GH"));

    let list = server.get("/api/socials").await;
    assert_eq!(list.json::<Value>()["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn profile_is_a_singleton() {
    let server = test_server().await;
    let token = login(&server).await;

    let before = server.get("/api/profile").await;
    assert_eq!(before.status_code(), StatusCode::OK);
    assert_eq!(before.json::<Value>()["data"], json!(null));

    let created = server
        .put("/api/profile")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "name": "Dev", "role": "Engineer" }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let patched = server
        .put("/api/profile")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "bio": "Builds things" }))
        .await;
    assert_eq!(patched.status_code(), StatusCode::OK);
    let body = patched.json::<Value>();
    assert_eq!(body["data"]["name"], json!("Dev"));
    assert_eq!(body["data"]["bio"], json!("Builds things"));
}

#[tokio::test]
async fn contact_messages_flow() {
    let server = test_server().await;

    // Public submission, no token.
    let sent = server
        .post("/api/messages")
        .json(&json!({
            "name": "Visitor",
            "email": "visitor@example.com",
            "message": "Hello there",
        }))
        .await;
    assert_eq!(sent.status_code(), StatusCode::CREATED);
    let id = sent.json::<Value>()["data"]["id"].as_str().unwrap().to_string();

    // Inbox requires auth.
    let denied = server.get("/api/messages").await;
    assert_eq!(denied.status_code(), StatusCode::UNAUTHORIZED);

    let token = login(&server).await;
    let inbox = server
        .get("/api/messages")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(inbox.status_code(), StatusCode::OK);
    let body = inbox.json::<Value>();
    assert_eq!(body["unreadCount"], json!(1));
    assert_eq!(body["data"][0]["is_read"], json!(false));

    let read = server
        .put(&format!("/api/messages/{id}/read"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(read.status_code(), StatusCode::OK);
    assert_eq!(read.json::<Value>()["data"]["is_read"], json!(true));

    let inbox = server
        .get("/api/messages")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(inbox.json::<Value>()["unreadCount"], json!(0));

    let removed = server
        .delete(&format!("/api/messages/{id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(removed.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn login_attempts_are_rate_limited() {
    let server = test_server().await;

    for _ in 0..5 {
        let res = server
            .post("/api/auth/login")
            .json(&json!({ "username": "admin", "password": "wrong-password" }))
            .await;
        assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    }

    let res = server
        .post("/api/auth/login")
        .json(&json!({ "username": "admin", "password": "wrong-password" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.json::<Value>()["error"], json!("Too many requests"));
    assert!(res.headers().get("Retry-After").is_some());
    assert_eq!(
        res.headers().get("X-RateLimit-Remaining").and_then(|v| v.to_str().ok()),
        Some("0")
    );
}

#[tokio::test]
async fn password_change_is_strictly_limited() {
    let server = test_server().await;
    let token = login(&server).await;

    for _ in 0..3 {
        let res = server
            .post("/api/auth/change-password")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&json!({
                "currentPassword": "not-the-password",
                "newPassword": "next-password",
            }))
            .await;
        assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.json::<Value>()["error"], json!("Current password is incorrect"));
    }

    let res = server
        .post("/api/auth/change-password")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "currentPassword": "not-the-password",
            "newPassword": "next-password",
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn password_change_allows_relogin() {
    let server = test_server().await;
    let token = login(&server).await;

    let res = server
        .post("/api/auth/change-password")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "currentPassword": ADMIN_PASSWORD,
            "newPassword": "a-brand-new-password",
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.json::<Value>()["message"], json!("Password changed successfully"));

    let old = server
        .post("/api/auth/login")
        .json(&json!({ "username": "admin", "password": ADMIN_PASSWORD }))
        .await;
    assert_eq!(old.status_code(), StatusCode::UNAUTHORIZED);

    let new = server
        .post("/api/auth/login")
        .json(&json!({ "username": "admin", "password": "a-brand-new-password" }))
        .await;
    assert_eq!(new.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let server = test_server().await;
    let token = login(&server).await;

    let res = server
        .post("/api/auth/logout")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn unknown_route_gets_envelope_404() {
    let server = test_server().await;
    let res = server.get("/api/nope").await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Route GET /api/nope not found"));
}

#[tokio::test]
async fn login_rejects_short_password_before_lookup() {
    let server = test_server().await;
    let res = server
        .post("/api/auth/login")
        .json(&json!({ "username": "admin", "password": "short" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>();
    assert_eq!(body["error"], json!("Validation failed"));
    assert_eq!(body["details"][0]["field"], json!("password"));
}

#[tokio::test]
async fn cors_allows_listed_and_vercel_origins_only() {
    let server = test_server().await;

    let listed = server
        .get("/api/health")
        .add_header(header::ORIGIN, "http://localhost:5173")
        .await;
    assert_eq!(
        listed
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
    assert_eq!(
        listed
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );

    let preview = server
        .get("/api/health")
        .add_header(header::ORIGIN, "https://portfolio-preview-abc123.vercel.app")
        .await;
    assert_eq!(
        preview
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("https://portfolio-preview-abc123.vercel.app")
    );

    let disallowed = server
        .get("/api/health")
        .add_header(header::ORIGIN, "https://evil.example.com")
        .await;
    assert!(disallowed
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = test_server().await;
    let res = server
        .post("/api/messages")
        .json(&json!({
            "name": "Visitor",
            "email": "visitor@example.com",
            "message": "x".repeat(11 * 1024),
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.json::<Value>()["success"], json!(false));

    // Nothing was stored.
    let token = login(&server).await;
    let inbox = server
        .get("/api/messages")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(inbox.json::<Value>()["data"], json!([]));
}

#[tokio::test]
async fn social_platform_from_path_is_sanitized_and_capped() {
    let server = test_server().await;
    let token = login(&server).await;

    let too_long = server
        .put(&format!("/api/socials/{}", "a".repeat(51)))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "href": "https://example.com", "label": "Link" }))
        .await;
    assert_eq!(too_long.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(too_long.json::<Value>()["details"][0]["field"], json!("platform"));

    // Tags in the decoded path segment are stripped before storage.
    let tagged = server
        .put("/api/socials/%3Cb%3Egithub%3C%2Fb%3E")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "href": "https://github.com/dev", "label": "GitHub" }))
        .await;
    assert_eq!(tagged.status_code(), StatusCode::CREATED);
    assert_eq!(tagged.json::<Value>()["data"]["platform"], json!("github"));
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let server = test_server().await;
    let res = server.get("/api/health").await;
    assert_eq!(
        res.headers().get("x-content-type-options").and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
    assert_eq!(
        res.headers().get("x-frame-options").and_then(|v| v.to_str().ok()),
        Some("DENY")
    );

    // Auth responses must not be cached.
    let login = server
        .post("/api/auth/login")
        .json(&json!({ "username": "admin", "password": "wrong-password" }))
        .await;
    let cache = login
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cache.contains("no-store"));
}
