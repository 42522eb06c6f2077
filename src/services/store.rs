//! Store service — JSON document persistence and per-account serialization.
//!
//! ARCHITECTURE
//! ============
//! `DocumentStore` is the persistence seam: whole documents in, whole
//! documents out, keyed by account id. `JsonFileStore` keeps one pretty-printed
//! file per account. `Documents` sits in front of any store and runs every
//! load-mutate-save cycle under a per-account lock, so two requests against
//! the same account can no longer overwrite each other's edits.
//!
//! ERROR HANDLING
//! ==============
//! A missing file reads as an empty document. A file that exists but cannot
//! be read or parsed is an error, never an empty document: treating it as
//! empty would overwrite the prior state on the next save.
//! Writes go to a temporary sibling and are renamed into place.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::OwnedMutexGuard;
use tracing::error;
use uuid::Uuid;

use crate::services::deck::{AccountDocument, DeckError};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("corrupt document {path}: {source}")]
    Corrupt { path: PathBuf, source: serde_json::Error },
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failure of a load-mutate-save cycle.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// JSON FILE HELPERS
// =============================================================================

/// Read and parse a JSON file, returning `T::default()` if it does not exist.
pub(crate) async fn read_json_or_default<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    };
    serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt { path: path.to_path_buf(), source })
}

/// Serialize `value` and atomically replace the file at `path`.
pub(crate) async fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
{
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };

    let body = serde_json::to_vec_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let tmp = PathBuf::from(tmp);

    if let Err(source) = tokio::fs::write(&tmp, &body).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_err(source));
    }
    if let Err(source) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(io_err(source));
    }
    Ok(())
}

// =============================================================================
// DOCUMENT STORE
// =============================================================================

/// Whole-document persistence keyed by account id.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load an account's document. An account with nothing stored yet yields
    /// an empty document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if stored state exists but cannot be read.
    async fn load(&self, account_id: Uuid) -> Result<AccountDocument, StoreError>;

    /// Replace an account's document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the document cannot be written.
    async fn save(&self, account_id: Uuid, document: &AccountDocument) -> Result<(), StoreError>;
}

/// One `<account id>.json` file per account under `data_dir`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    #[must_use]
    pub fn document_path(&self, account_id: Uuid) -> PathBuf {
        self.data_dir.join(format!("{account_id}.json"))
    }
}

#[async_trait::async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self, account_id: Uuid) -> Result<AccountDocument, StoreError> {
        read_json_or_default(&self.document_path(account_id)).await
    }

    async fn save(&self, account_id: Uuid, document: &AccountDocument) -> Result<(), StoreError> {
        write_json_atomic(&self.document_path(account_id), document).await
    }
}

// =============================================================================
// PER-ACCOUNT LOCKS
// =============================================================================

/// Keyed async mutex: one lock per account id, created on first use.
///
/// Entries are never evicted. The map holds at most one small entry per
/// account, and removing an entry while a waiter still holds its `Arc` would
/// let a second lock for the same account appear.
#[derive(Clone, Default)]
pub struct AccountLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>,
}

impl AccountLocks {
    pub async fn acquire(&self, account_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(account_id).or_default())
        };
        lock.lock_owned().await
    }
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Serialized access to account documents.
#[derive(Clone)]
pub struct Documents {
    store: Arc<dyn DocumentStore>,
    locks: AccountLocks,
}

impl Documents {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store, locks: AccountLocks::default() }
    }

    /// Snapshot of an account's document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if stored state cannot be read.
    pub async fn read(&self, account_id: Uuid) -> Result<AccountDocument, StoreError> {
        self.store.load(account_id).await
    }

    /// Overwrite an account's document wholesale.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the document cannot be written.
    pub async fn replace(&self, account_id: Uuid, document: &AccountDocument) -> Result<(), StoreError> {
        let _guard = self.locks.acquire(account_id).await;
        self.store.save(account_id, document).await
    }

    /// Load, mutate and save one account's document while holding its lock.
    ///
    /// Nothing is saved if `mutate` fails or leaves a card pointing at a
    /// missing category.
    ///
    /// # Errors
    ///
    /// Returns the mutation's [`DeckError`], an integrity violation, or a
    /// [`StoreError`] from load/save.
    pub async fn update<T, F>(&self, account_id: Uuid, mutate: F) -> Result<T, UpdateError>
    where
        F: FnOnce(&mut AccountDocument) -> Result<T, DeckError> + Send,
        T: Send,
    {
        let _guard = self.locks.acquire(account_id).await;
        let mut document = self.store.load(account_id).await?;
        let out = mutate(&mut document)?;
        if let Err(e) = document.check_integrity() {
            error!(%account_id, error = %e, "refusing to save document with dangling card");
            return Err(e.into());
        }
        self.store.save(account_id, &document).await?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
