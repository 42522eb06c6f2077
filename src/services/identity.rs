//! Identity service — account registration and password authentication.
//!
//! DESIGN
//! ======
//! All accounts live in one JSON identity document. Registration runs its
//! load-check-save under an in-process mutex so two concurrent sign-ups for
//! the same username cannot both pass the uniqueness check.
//!
//! TRADE-OFFS
//! ==========
//! bcrypt is CPU-bound and runs on the blocking pool. Unknown usernames still
//! pay for one verification against a dummy hash, keeping the failure path
//! indistinguishable from a wrong password.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};
use uuid::Uuid;

use crate::services::clock::Clock;
use crate::services::store::{StoreError, read_json_or_default, write_json_atomic};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct IdentityDocument {
    #[serde(default)]
    users: Vec<Account>,
}

impl IdentityDocument {
    fn find_by_username(&self, username: &str) -> Option<&Account> {
        let key = username.to_lowercase();
        self.users.iter().find(|a| a.username.to_lowercase() == key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("username and password required")]
    InvalidInput,
    #[error("username already exists")]
    UsernameTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// PASSWORD HASHING
// =============================================================================

async fn hash_password(password: String, cost: u32) -> Result<String, IdentityError> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
}

async fn verify_password(password: String, hash: String) -> Result<bool, IdentityError> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
}

// =============================================================================
// IDENTITY STORE
// =============================================================================

pub struct IdentityStore {
    path: PathBuf,
    cost: u32,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
    dummy_hash: OnceCell<String>,
}

impl IdentityStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, cost: u32, clock: Arc<dyn Clock>) -> Self {
        Self { path: path.into(), cost, clock, write_lock: Mutex::new(()), dummy_hash: OnceCell::new() }
    }

    /// Create the identity document if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if an existing document is unreadable or the
    /// file cannot be written.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let doc: IdentityDocument = read_json_or_default(&self.path).await?;
        write_json_atomic(&self.path, &doc).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidInput`] for an empty username or
    /// password, [`IdentityError::UsernameTaken`] if the name exists in any
    /// letter case, or a hashing/storage error.
    pub async fn register(&self, username: &str, password: &str) -> Result<Account, IdentityError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(IdentityError::InvalidInput);
        }

        let _guard = self.write_lock.lock().await;
        let mut doc: IdentityDocument = read_json_or_default(&self.path).await?;
        if doc.find_by_username(username).is_some() {
            return Err(IdentityError::UsernameTaken);
        }

        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            password_hash: hash_password(password.to_owned(), self.cost).await?,
            created_at: self.clock.now(),
        };
        doc.users.push(account.clone());
        write_json_atomic(&self.path, &doc).await?;

        info!(account_id = %account.id, "account registered");
        Ok(account)
    }

    /// Check a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] alike for an unknown
    /// username and a wrong password, or a hashing/storage error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Account, IdentityError> {
        let doc: IdentityDocument = read_json_or_default(&self.path).await?;

        let Some(account) = doc.find_by_username(username.trim()).cloned() else {
            let dummy = self.dummy_hash().await?;
            let _ = verify_password(password.to_owned(), dummy).await;
            debug!("login for unknown username");
            return Err(IdentityError::InvalidCredentials);
        };

        if verify_password(password.to_owned(), account.password_hash.clone()).await? {
            Ok(account)
        } else {
            debug!(account_id = %account.id, "login with wrong password");
            Err(IdentityError::InvalidCredentials)
        }
    }

    async fn dummy_hash(&self) -> Result<String, IdentityError> {
        self.dummy_hash
            .get_or_try_init(|| hash_password(Uuid::new_v4().to_string(), self.cost))
            .await
            .cloned()
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
