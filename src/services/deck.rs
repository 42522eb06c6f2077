//! Deck service — categories and cards inside one account document.
//!
//! DESIGN
//! ======
//! An `AccountDocument` is the unit of persistence: it is loaded whole,
//! mutated in memory by the functions below, and saved whole. These functions
//! never touch storage; the store module wraps them in load-mutate-save.
//!
//! INVARIANTS
//! ==========
//! Every card's `category_id` names a category in the same document. Nothing
//! structural enforces this, so `create_card` refuses unknown categories,
//! `delete_category` cascades, and `check_integrity` runs before every save.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub category_id: Uuid,
    pub word: String,
    pub translation: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// All categories and cards of one account, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("category not found")]
    CategoryNotFound,
    #[error("card not found")]
    CardNotFound,
    #[error("nothing to update")]
    NothingToUpdate,
    #[error("card {card_id} references missing category {category_id}")]
    DanglingCard { card_id: Uuid, category_id: Uuid },
}

/// Partial card edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub word: Option<String>,
    pub translation: Option<String>,
}

fn non_empty(raw: &str, message: &'static str) -> Result<String, DeckError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DeckError::InvalidInput(message));
    }
    Ok(trimmed.to_owned())
}

// =============================================================================
// READ
// =============================================================================

impl AccountDocument {
    #[must_use]
    pub fn category(&self, category_id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Cards belonging to one category, in insertion order.
    #[must_use]
    pub fn cards_in(&self, category_id: Uuid) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.category_id == category_id).collect()
    }

    /// Return the first card whose category is absent from the document.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::DanglingCard`] naming the offending card.
    pub fn check_integrity(&self) -> Result<(), DeckError> {
        match self.cards.iter().find(|card| self.category(card.category_id).is_none()) {
            Some(card) => Err(DeckError::DanglingCard { card_id: card.id, category_id: card.category_id }),
            None => Ok(()),
        }
    }
}

// =============================================================================
// CATEGORIES
// =============================================================================

impl AccountDocument {
    /// Append a new category.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::InvalidInput`] if the name is empty after trimming.
    pub fn create_category(&mut self, name: &str, now: OffsetDateTime) -> Result<Category, DeckError> {
        let name = non_empty(name, "name required")?;
        let category = Category { id: Uuid::new_v4(), name, created_at: now };
        self.categories.push(category.clone());
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns [`DeckError::InvalidInput`] for an empty name, or
    /// [`DeckError::CategoryNotFound`] if no such category exists.
    pub fn rename_category(&mut self, category_id: Uuid, name: &str) -> Result<Category, DeckError> {
        let name = non_empty(name, "name required")?;
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or(DeckError::CategoryNotFound)?;
        category.name = name;
        Ok(category.clone())
    }

    /// Remove a category and every card filed under it.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::CategoryNotFound`] if no such category exists.
    pub fn delete_category(&mut self, category_id: Uuid) -> Result<Category, DeckError> {
        let idx = self
            .categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or(DeckError::CategoryNotFound)?;
        let removed = self.categories.remove(idx);
        self.cards.retain(|card| card.category_id != removed.id);
        Ok(removed)
    }
}

// =============================================================================
// CARDS
// =============================================================================

impl AccountDocument {
    /// Append a card under an existing category.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::InvalidInput`] if either side is empty after
    /// trimming, or [`DeckError::CategoryNotFound`] for an unknown category.
    pub fn create_card(
        &mut self,
        category_id: Uuid,
        word: &str,
        translation: &str,
        now: OffsetDateTime,
    ) -> Result<Card, DeckError> {
        let (Ok(word), Ok(translation)) = (
            non_empty(word, "word and translation required"),
            non_empty(translation, "word and translation required"),
        ) else {
            return Err(DeckError::InvalidInput("word and translation required"));
        };
        if self.category(category_id).is_none() {
            return Err(DeckError::CategoryNotFound);
        }

        let card = Card { id: Uuid::new_v4(), category_id, word, translation, created_at: now };
        self.cards.push(card.clone());
        Ok(card)
    }

    /// Apply a partial edit. All supplied fields are validated before any is
    /// written, so a rejected patch leaves the card as it was.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::CardNotFound`], [`DeckError::InvalidInput`] for an
    /// empty supplied field, or [`DeckError::NothingToUpdate`] when the patch
    /// carries no fields.
    pub fn update_card(&mut self, card_id: Uuid, patch: CardPatch) -> Result<Card, DeckError> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or(DeckError::CardNotFound)?;

        let word = patch.word.as_deref().map(|w| non_empty(w, "word cannot be empty")).transpose()?;
        let translation = patch
            .translation
            .as_deref()
            .map(|t| non_empty(t, "translation cannot be empty"))
            .transpose()?;
        if word.is_none() && translation.is_none() {
            return Err(DeckError::NothingToUpdate);
        }

        if let Some(word) = word {
            card.word = word;
        }
        if let Some(translation) = translation {
            card.translation = translation;
        }
        Ok(card.clone())
    }

    /// # Errors
    ///
    /// Returns [`DeckError::CardNotFound`] if no such card exists.
    pub fn delete_card(&mut self, card_id: Uuid) -> Result<Card, DeckError> {
        let idx = self
            .cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(DeckError::CardNotFound)?;
        Ok(self.cards.remove(idx))
    }
}

#[cfg(test)]
#[path = "deck_test.rs"]
mod tests;
