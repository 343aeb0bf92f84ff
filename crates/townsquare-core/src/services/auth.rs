use serde_json::json;
use tracing::{debug, info};

use crate::api::{ApiError, HttpClient, HttpError, RequestBody, NETWORK_ERROR_MESSAGE};
use crate::auth::Credentials;
use crate::models::{AuthResponse, Registration};

use super::check_present;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
const RESET_FAILED: &str = "Failed to request password reset";
const OTP_FAILED: &str = "Failed to verify OTP";

/// Login, sign-up and password reset. None of these need a token.
#[derive(Clone)]
pub struct AuthService {
    http: HttpClient,
    credentials: Credentials,
}

impl AuthService {
    pub fn new(http: HttpClient, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    /// Log in and store the returned token.
    ///
    /// A success payload without a token is treated as a failed login and
    /// nothing is stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::validation("Please enter both email and password."));
        }

        debug!("Attempting login");
        let body = json!({ "email": email, "password": password });
        let response = self
            .http
            .post("/auth/login", RequestBody::Json(body), None)
            .await
            .map_err(|e| ApiError::from_http(e, LOGIN_FAILED))?;

        let payload = AuthResponse::from_value(response.body);
        let token = payload
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse(LOGIN_FAILED.to_string()))?;

        self.credentials.save(token).await?;
        info!("Login succeeded");
        Ok(payload)
    }

    /// Create an account. If the server hands back a token it is stored,
    /// the same as after a login.
    ///
    /// Unlike the other operations, an unreachable server is reported with
    /// the generic network message.
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        registration.validate().map_err(ApiError::Validation)?;

        debug!("Attempting registration");
        let response = self
            .http
            .post("/auth/register", RequestBody::Json(json!(registration)), None)
            .await
            .map_err(|e| match e {
                HttpError::Unreachable(source) => ApiError::Unreachable {
                    message: NETWORK_ERROR_MESSAGE.to_string(),
                    source,
                },
                other => ApiError::from_http(other, REGISTRATION_FAILED),
            })?;

        let payload = AuthResponse::from_value(response.body);
        if let Some(token) = payload.token.as_deref().filter(|t| !t.is_empty()) {
            self.credentials.save(token).await?;
        }
        info!("Registration succeeded");
        Ok(payload)
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<AuthResponse, ApiError> {
        check_present(email, "Please enter your email address.")?;

        let response = self
            .http
            .post("/auth/request-reset", RequestBody::Json(json!({ "email": email })), None)
            .await
            .map_err(|e| ApiError::from_http(e, RESET_FAILED))?;
        Ok(AuthResponse::from_value(response.body))
    }

    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthResponse, ApiError> {
        check_present(email, "Please enter your email address.")?;
        check_present(otp, "Please enter the OTP.")?;

        let body = json!({ "email": email, "otp": otp });
        let response = self
            .http
            .post("/auth/validate-otp", RequestBody::Json(body), None)
            .await
            .map_err(|e| ApiError::from_http(e, OTP_FAILED))?;
        Ok(AuthResponse::from_value(response.body))
    }

    /// Forget the stored token. Local only; the server is not told.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.credentials.clear().await?;
        info!("Logged out");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool, ApiError> {
        Ok(self
            .credentials
            .load()
            .await?
            .is_some_and(|token| !token.is_empty()))
    }
}
