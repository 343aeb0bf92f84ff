use crate::api::{ApiError, HttpClient};
use crate::auth::Credentials;
use crate::models::Notification;

use super::{authorized, decode};

const FETCH_FAILED: &str = "Failed to fetch notifications.";

#[derive(Clone)]
pub struct NotificationService {
    http: HttpClient,
    credentials: Credentials,
}

impl NotificationService {
    pub fn new(http: HttpClient, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    /// Notifications addressed to the logged-in user.
    pub async fn list_for_user(&self) -> Result<Vec<Notification>, ApiError> {
        let headers = authorized(&self.credentials).await?;
        decode(
            self.http.get("/notification/user", Some(headers)).await,
            FETCH_FAILED,
        )
    }
}
