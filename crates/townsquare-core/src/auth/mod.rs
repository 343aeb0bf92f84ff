//! Authentication module for managing the stored session token.
//!
//! This module provides:
//! - `TokenStore`: persistence of the single `userToken` credential, with
//!   keychain, file and in-memory backends
//! - `Credentials`: the handle injected into services, which also publishes
//!   session changes to observers
//!
//! Tokens do not expire client-side; a session lasts until logout.

pub mod credentials;
pub mod store;

pub use credentials::{Credentials, SessionState};
pub use store::{FileStore, KeyringStore, MemoryStore, StoreError, TokenStore, TOKEN_KEY};
