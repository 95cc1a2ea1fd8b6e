use axum::{
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, experiences, health, messages, profile, projects, skills, socials};
use crate::middleware::{cors_layer, global_rate_limit, security_headers_middleware};
use crate::state::AppState;

/// Request bodies are capped well below any legitimate payload.
const BODY_LIMIT_BYTES: usize = 10 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health))
        // Authentication
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/verify", post(auth::verify))
        .route("/api/auth/change-password", post(auth::change_password))
        // Projects
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::get_one)
                .put(projects::update)
                .delete(projects::remove),
        )
        // Skills
        .route("/api/skills", get(skills::list).post(skills::create))
        .route(
            "/api/skills/{id}",
            get(skills::get_one).put(skills::update).delete(skills::remove),
        )
        // Experiences
        .route(
            "/api/experiences",
            get(experiences::list).post(experiences::create),
        )
        .route(
            "/api/experiences/{id}",
            get(experiences::get_one)
                .put(experiences::update)
                .delete(experiences::remove),
        )
        // Socials
        .route("/api/socials", get(socials::list))
        .route("/api/socials/{platform}", put(socials::upsert))
        // Profile (singleton)
        .route("/api/profile", get(profile::get).put(profile::put))
        // Messages: the POST is the public contact form, the rest is inbox
        // administration.
        .route("/api/messages", get(messages::list).post(messages::create))
        .route("/api/messages/{id}/read", put(messages::mark_read))
        .route("/api/messages/{id}", delete(messages::remove))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), global_rate_limit))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.settings.cors))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

async fn not_found(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Not found",
            "message": format!("Route {} {} not found", method, uri.path()),
        })),
    )
        .into_response()
}
