//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own identity, tokens, deck rules and persistence so route
//! handlers stay focused on protocol translation and auth plumbing.

pub mod clock;
pub mod deck;
pub mod identity;
pub mod seed;
pub mod store;
pub mod token;
