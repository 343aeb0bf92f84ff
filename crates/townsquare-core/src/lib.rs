//! Townsquare core library.
//!
//! Session-gated access to the community service REST API: a persisted
//! bearer token, an HTTP client bound to the configured base address, and
//! one service per resource (auth, events, forums, notifications, profile).
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use townsquare_core::{Config, Townsquare};
//!
//! let client = Townsquare::from_config(&Config::load()?).await?;
//! client.auth().login("dana@example.com", "secret").await?;
//! for event in client.events().list().await? {
//!     println!("{}", event.display_title());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use api::{ApiError, ErrorKind, HttpClient, ImageUpload};
pub use auth::{Credentials, SessionState, TokenStore};
pub use client::Townsquare;
pub use config::{Config, CredentialBackend};
