//! Resource services, one per server-side resource.
//!
//! Every operation follows the same shape: check arguments, load the token
//! if the endpoint needs one, issue exactly one request, and map the result.
//! Failures become an [`ApiError`] whose message is the server's `error`
//! field when it sent one, otherwise the operation's default message.

pub mod auth;
pub mod events;
pub mod forums;
pub mod notifications;
pub mod profile;

pub use auth::AuthService;
pub use events::EventService;
pub use forums::ForumService;
pub use notifications::NotificationService;
pub use profile::ProfileService;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::api::{ApiError, HttpError, HttpResponse};
use crate::auth::{Credentials, StoreError};

/// `Authorization` header carrying the token verbatim.
fn auth_headers(token: &str) -> Result<HeaderMap, ApiError> {
    let mut value =
        HeaderValue::from_str(token).map_err(|_| ApiError::Storage(StoreError::InvalidToken))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, value);
    Ok(headers)
}

/// Headers for an authenticated call, or `MissingCredential` before any I/O.
pub(crate) async fn authorized(credentials: &Credentials) -> Result<HeaderMap, ApiError> {
    let token = credentials.require().await?;
    auth_headers(&token)
}

/// Typed payload of a response, or the mapped error.
pub(crate) fn decode<T: DeserializeOwned>(
    result: Result<HttpResponse, HttpError>,
    fallback: &str,
) -> Result<T, ApiError> {
    result
        .and_then(HttpResponse::json)
        .map_err(|e| ApiError::from_http(e, fallback))
}

/// Resource ids are interpolated into paths, so they must be non-blank and
/// a single path segment.
pub(crate) fn check_id<'a>(id: &'a str, resource: &str) -> Result<&'a str, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::validation(format!("Missing {} id.", resource)));
    }
    if id.contains(['/', '?', '#']) {
        return Err(ApiError::validation(format!("Invalid {} id.", resource)));
    }
    Ok(id)
}

pub(crate) fn check_present(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::validation(message))
    } else {
        Ok(())
    }
}
