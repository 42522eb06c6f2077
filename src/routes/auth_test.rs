use super::*;
use crate::routes::app;
use crate::routes::test_support::{register as register_account, send};
use crate::state::test_helpers::test_app_state;
use axum::http::{Method, StatusCode};
use serde_json::json;

// =============================================================================
// register
// =============================================================================

#[tokio::test]
async fn register_returns_token_and_public_user() {
    let (state, _dir) = test_app_state();
    let app = app(state.clone());

    let (status, body) =
        send(&app, Method::POST, "/auth/register", None, Some(json!({ "username": "hans", "password": "pw" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "hans");
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let claims = state.tokens.verify(token).unwrap();
    assert_eq!(claims.id.to_string(), body["user"]["id"].as_str().unwrap());
}

#[tokio::test]
async fn register_seeds_starter_deck() {
    let (state, _dir) = test_app_state();
    let app = app(state.clone());
    let (_token, id) = register_account(&app, "ida", "pw").await;

    let doc = state.documents.read(id).await.unwrap();
    assert_eq!(doc.categories.len(), 4);
    assert_eq!(doc.cards.len(), 24);
    for category in &doc.categories {
        assert_eq!(doc.cards_in(category.id).len(), 6);
    }
    assert!(doc.check_integrity().is_ok());
}

#[tokio::test]
async fn register_missing_fields_is_bad_request() {
    let (state, _dir) = test_app_state();
    let app = app(state);

    for body in [json!({}), json!({ "username": "x" }), json!({ "password": "y" }), json!({ "username": "", "password": "y" })] {
        let (status, resp) = send(&app, Method::POST, "/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["message"], "username and password required");
    }
}

#[tokio::test]
async fn register_duplicate_username_is_bad_request() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    register_account(&app, "Jana", "pw").await;

    let (status, body) =
        send(&app, Method::POST, "/auth/register", None, Some(json!({ "username": "JANA", "password": "pw" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn register_malformed_json_is_bad_request() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    let (status, body) =
        send(&app, Method::POST, "/auth/register", None, Some(json!({ "username": 7, "password": "pw" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_with_correct_credentials() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    let (_, id) = register_account(&app, "karl", "pw").await;

    let (status, body) =
        send(&app, Method::POST, "/auth/login", None, Some(json!({ "username": "KARL", "password": "pw" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], id.to_string());
    assert_eq!(body["user"]["username"], "karl");
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn login_failures_share_one_response() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    register_account(&app, "lena", "pw").await;

    let wrong = send(&app, Method::POST, "/auth/login", None, Some(json!({ "username": "lena", "password": "no" }))).await;
    let unknown =
        send(&app, Method::POST, "/auth/login", None, Some(json!({ "username": "ghost", "password": "pw" }))).await;
    let missing = send(&app, Method::POST, "/auth/login", None, Some(json!({}))).await;

    assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
    assert_eq!(wrong, missing);
    assert_eq!(wrong.1["message"], "Invalid credentials");
}

// =============================================================================
// me / bearer extractor
// =============================================================================

#[tokio::test]
async fn me_returns_token_identity() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    let (token, id) = register_account(&app, "max", "pw").await;

    let (status, body) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": id.to_string(), "username": "max" }));
}

#[tokio::test]
async fn me_without_token_is_missing_token() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    let (status, body) = send(&app, Method::GET, "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing token");
}

#[tokio::test]
async fn me_with_garbage_token_is_invalid_token() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    let (status, body) = send(&app, Method::GET, "/me", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn empty_bearer_value_is_missing_token() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    for blank in ["", "   "] {
        let (status, body) = send(&app, Method::GET, "/me", Some(blank), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Missing token", "bearer {blank:?}");
    }
}

#[tokio::test]
async fn non_bearer_scheme_is_missing_token() {
    let (state, _dir) = test_app_state();
    let app = app(state);
    let req = axum::http::Request::builder()
        .uri("/me")
        .header(axum::http::header::AUTHORIZATION, "Basic dXNlcjpwdw==")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let (state, _dir) = test_app_state();
    let (other, _other_dir) = test_app_state();
    let app = app(state);

    let foreign = other.identity.register("nina", "pw").await.unwrap();
    let token = crate::services::token::TokenService::new(
        b"another-secret",
        std::time::Duration::from_secs(60),
        other.clock.clone(),
    )
    .issue(&foreign)
    .unwrap();

    let (status, body) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[test]
fn auth_user_from_claims() {
    let id = Uuid::new_v4();
    let user = AuthUser::from(Claims { id, username: "olga".into(), iat: 0, exp: 1 });
    assert_eq!(user.id, id);
    assert_eq!(user.username, "olga");
}
