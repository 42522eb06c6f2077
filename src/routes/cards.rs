//! Card routes — list and create under a category, edit and delete by id.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use super::auth::AuthUser;
use super::categories::entity_id;
use super::error::ApiError;
use crate::services::deck::{Card, CardPatch, DeckError};
use crate::services::store::UpdateError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CardBody {
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
}

/// `GET /categories/:id/cards`: cards of one category. An unknown category
/// simply has no cards.
pub async fn list_cards(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let doc = state.documents.read(auth.id).await?;
    Ok(Json(doc.cards_in(entity_id(&id)).into_iter().cloned().collect()))
}

/// `POST /categories/:id/cards`: add a card to an existing category.
pub async fn create_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<CardBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    let Json(body) = body?;
    let word = body.word.unwrap_or_default();
    let translation = body.translation.unwrap_or_default();
    let category_id = entity_id(&id);
    let now = state.clock.now();

    let card = state
        .documents
        .update(auth.id, |doc| doc.create_card(category_id, &word, &translation, now))
        .await
        .map_err(|e| match e {
            UpdateError::Deck(DeckError::CategoryNotFound) => ApiError::NotFound("Category not found"),
            other => other.into(),
        })?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// `PUT /cards/:id`: edit word and/or translation.
pub async fn update_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<CardBody>, JsonRejection>,
) -> Result<Json<Card>, ApiError> {
    let Json(body) = body?;
    let card_id = entity_id(&id);
    let patch = CardPatch { word: body.word, translation: body.translation };

    let card = state
        .documents
        .update(auth.id, |doc| doc.update_card(card_id, patch))
        .await?;
    Ok(Json(card))
}

/// `DELETE /cards/:id`: remove one card.
pub async fn delete_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let card_id = entity_id(&id);
    state.documents.update(auth.id, |doc| doc.delete_card(card_id)).await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "cards_test.rs"]
mod tests;
