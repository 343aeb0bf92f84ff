//! Data models for community service payloads.
//!
//! This module contains the structures returned by and sent to the API:
//!
//! - `Event`, `MyEvent`, `EventDraft`: community events
//! - `Forum`, `Comment`: discussion posts
//! - `Notification`: per-user event notifications
//! - `UserProfile`, `Registration`: accounts
//! - `AuthResponse`: login / sign-up / reset payloads
//!
//! Every server field is optional; the server's `_id` and `id` are both
//! accepted.

pub mod auth;
pub mod event;
pub mod forum;
pub mod notification;
pub mod user;

pub use auth::AuthResponse;
pub use event::{Event, EventDraft, MyEvent, ParticipantRange};
pub use forum::{Comment, Creator, Forum};
pub use notification::Notification;
pub use user::{Registration, UserProfile};
