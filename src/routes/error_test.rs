use super::*;
use axum::body::to_bytes;
use uuid::Uuid;

async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn response_body_carries_message() {
    let (status, body) = render(ApiError::UsernameTaken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, serde_json::json!({ "message": "Username already exists" }));

    let (status, body) = render(ApiError::Internal).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[test]
fn status_mapping() {
    assert_eq!(ApiError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::NothingToUpdate.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::MissingToken.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::NotFound("Not found").status(), StatusCode::NOT_FOUND);
}

#[test]
fn deck_errors_map_to_client_errors() {
    assert!(matches!(
        ApiError::from(DeckError::InvalidInput("name required")),
        ApiError::InvalidInput(ref m) if m == "name required"
    ));
    assert!(matches!(ApiError::from(DeckError::CategoryNotFound), ApiError::NotFound("Not found")));
    assert!(matches!(ApiError::from(DeckError::CardNotFound), ApiError::NotFound("Not found")));
    assert!(matches!(ApiError::from(DeckError::NothingToUpdate), ApiError::NothingToUpdate));
}

#[test]
fn dangling_card_is_internal() {
    let err = DeckError::DanglingCard { card_id: Uuid::new_v4(), category_id: Uuid::new_v4() };
    assert!(matches!(ApiError::from(err), ApiError::Internal));
    assert!(matches!(ApiError::from(UpdateError::Deck(DeckError::CardNotFound)), ApiError::NotFound(_)));
}

#[test]
fn identity_errors_map_without_leaking_detail() {
    assert_eq!(ApiError::from(IdentityError::InvalidInput).to_string(), "username and password required");
    assert!(matches!(ApiError::from(IdentityError::UsernameTaken), ApiError::UsernameTaken));
    assert!(matches!(ApiError::from(IdentityError::InvalidCredentials), ApiError::InvalidCredentials));

    let io = StoreError::Io { path: "users.json".into(), source: std::io::Error::other("disk gone") };
    let mapped = ApiError::from(IdentityError::Store(io));
    assert!(matches!(mapped, ApiError::Internal));
    assert_eq!(mapped.to_string(), "Internal server error");
}

#[test]
fn token_errors_are_invalid_token() {
    for err in [TokenError::Malformed, TokenError::BadSignature, TokenError::Expired] {
        assert!(matches!(ApiError::from(err), ApiError::InvalidToken));
    }
}

#[test]
fn signing_errors_are_internal() {
    let err = jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat);
    assert!(matches!(ApiError::from(err), ApiError::Internal));
}
