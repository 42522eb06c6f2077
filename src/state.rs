//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the identity store, the token service and the per-account
//! document access layer, plus the clock every timestamp is read from.

use std::sync::Arc;

use crate::config::Config;
use crate::services::clock::{Clock, SystemClock};
use crate::services::identity::IdentityStore;
use crate::services::store::{Documents, JsonFileStore};
use crate::services::token::TokenService;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityStore>,
    pub tokens: Arc<TokenService>,
    pub documents: Documents,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build file-backed state from config.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let identity = IdentityStore::new(config.users_path.clone(), config.bcrypt_cost, Arc::clone(&clock));
        let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl, Arc::clone(&clock));
        let documents = Documents::new(Arc::new(JsonFileStore::new(config.data_dir.clone())));
        Self { identity: Arc::new(identity), tokens: Arc::new(tokens), documents, clock }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
