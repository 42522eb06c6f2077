//! HTTP error type — maps service failures to status + `{"message": ...}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::services::deck::DeckError;
use crate::services::identity::IdentityError;
use crate::services::store::{StoreError, UpdateError};
use crate::services::token::TokenError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("nothing to update")]
    NothingToUpdate,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::UsernameTaken | Self::NothingToUpdate => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::MissingToken | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(serde_json::json!({ "message": self.to_string() }))).into_response()
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<DeckError> for ApiError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::InvalidInput(msg) => Self::InvalidInput(msg.to_owned()),
            DeckError::CategoryNotFound | DeckError::CardNotFound => Self::NotFound("Not found"),
            DeckError::NothingToUpdate => Self::NothingToUpdate,
            DeckError::DanglingCard { .. } => Self::Internal,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "document store failure");
        Self::Internal
    }
}

impl From<UpdateError> for ApiError {
    fn from(err: UpdateError) -> Self {
        match err {
            UpdateError::Deck(e) => e.into(),
            UpdateError::Store(e) => e.into(),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidInput => Self::InvalidInput(err.to_string()),
            IdentityError::UsernameTaken => Self::UsernameTaken,
            IdentityError::InvalidCredentials => Self::InvalidCredentials,
            IdentityError::Hash(_) | IdentityError::Join(_) | IdentityError::Store(_) => {
                error!(error = %err, "identity store failure");
                Self::Internal
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(_: TokenError) -> Self {
        Self::InvalidToken
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        error!(error = %err, "token signing failure");
        Self::Internal
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
