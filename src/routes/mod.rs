//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the REST endpoints under a single Axum router. Only the
//! two `/auth/*` endpoints, `/` and `/healthz` are reachable without a bearer
//! token; every other handler takes an `AuthUser`.

pub mod auth;
pub mod cards;
pub mod categories;
pub mod error;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full API router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/me", get(auth::me))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::rename_category)
                .delete(categories::delete_category),
        )
        .route(
            "/categories/{id}/cards",
            get(cards::list_cards).post(cards::create_card),
        )
        .route("/cards/{id}", put(cards::update_card).delete(cards::delete_card))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
pub(crate) mod test_support;
