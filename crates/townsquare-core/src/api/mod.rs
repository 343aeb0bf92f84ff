//! REST API plumbing shared by every service.
//!
//! This module provides the `HttpClient` bound to the configured base
//! address, the multipart body used for image uploads, and the unified
//! `ApiError` every service operation returns.
//!
//! The stored token is sent verbatim as the `Authorization` header value.

pub mod error;
pub mod http;
pub mod multipart;

pub use error::{ApiError, ErrorKind, MISSING_CREDENTIAL_MESSAGE, NETWORK_ERROR_MESSAGE};
pub use http::{ErrorBody, HttpClient, HttpError, HttpResponse, RequestBody, DEFAULT_BASE_URL};
pub use multipart::{ImageUpload, MultipartForm, IMAGE_FIELD, IMAGE_MIME};
