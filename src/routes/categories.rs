//! Category routes — list, fetch, create, rename, cascade delete.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::auth::AuthUser;
use super::error::ApiError;
use crate::services::deck::Category;
use crate::state::AppState;

/// Parse a path id. Unparsable ids resolve to the nil id, which no entity
/// carries, so they surface as not found.
pub(crate) fn entity_id(raw: &str) -> Uuid {
    Uuid::try_parse(raw).unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryBody {
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /categories`: all categories in insertion order.
pub async fn list_categories(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<Category>>, ApiError> {
    let doc = state.documents.read(auth.id).await?;
    Ok(Json(doc.categories))
}

/// `GET /categories/:id`: fetch one category.
pub async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let doc = state.documents.read(auth.id).await?;
    doc.category(entity_id(&id))
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound("Not found"))
}

/// `POST /categories`: append a category.
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(body) = body?;
    let name = body.name.unwrap_or_default();
    let now = state.clock.now();

    let category = state
        .documents
        .update(auth.id, |doc| doc.create_category(&name, now))
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// `PUT /categories/:id`: rename a category.
pub async fn rename_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(body) = body?;
    let name = body.name.unwrap_or_default();
    let category_id = entity_id(&id);

    let category = state
        .documents
        .update(auth.id, |doc| doc.rename_category(category_id, &name))
        .await?;
    Ok(Json(category))
}

/// `DELETE /categories/:id`: remove a category and all of its cards.
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category_id = entity_id(&id);
    state
        .documents
        .update(auth.id, |doc| doc.delete_category(category_id))
        .await?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "categories_test.rs"]
mod tests;
