//! Auth routes — registration, login, and the bearer-token extractor.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::response::Json;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use super::error::ApiError;
use crate::services::identity::Account;
use crate::services::seed;
use crate::services::token::Claims;
use crate::state::AppState;

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Account resolved from the `Authorization: Bearer` header.
/// Use as a handler parameter to require authentication.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { id: claims.id, username: claims.username }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::MissingToken)?;
        if bearer.token().trim().is_empty() {
            return Err(ApiError::MissingToken);
        }

        let app_state = AppState::from_ref(state);
        let claims = app_state.tokens.verify(bearer.token()).map_err(|e| {
            debug!(error = %e, "bearer token rejected");
            ApiError::from(e)
        })?;
        Ok(claims.into())
    }
}

// =============================================================================
// BODIES
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
}

impl From<&Account> for PublicUser {
    fn from(account: &Account) -> Self {
        Self { id: account.id, username: account.username.clone() }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

fn auth_response(state: &AppState, account: &Account) -> Result<Json<AuthResponse>, ApiError> {
    let token = state.tokens.issue(account)?;
    Ok(Json(AuthResponse { token, user: account.into() }))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /auth/register`: create an account with a seeded deck and return a token.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(body) = body?;
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let account = state.identity.register(&username, &password).await?;

    let starter = seed::seeded_document(state.clock.now());
    state.documents.replace(account.id, &starter).await.inspect_err(|e| {
        error!(account_id = %account.id, error = %e, "failed to seed account document");
    })?;

    auth_response(&state, &account)
}

/// `POST /auth/login`: check credentials, return a token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsBody>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(body) = body?;
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(ApiError::InvalidCredentials);
    };

    let account = state.identity.authenticate(&username, &password).await?;
    auth_response(&state, &account)
}

/// `GET /me`: return the caller's identity from the token.
pub async fn me(auth: AuthUser) -> Json<PublicUser> {
    Json(PublicUser { id: auth.id, username: auth.username })
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
