use crate::api::{ApiError, HttpClient};
use crate::auth::Credentials;
use crate::models::{MyEvent, UserProfile};

use super::{authorized, decode, EventService};

const FETCH_PROFILE_FAILED: &str = "Failed to fetch user profile.";

/// The logged-in user's profile, plus the event management the profile
/// screen offers (delegated to [`EventService`]).
#[derive(Clone)]
pub struct ProfileService {
    http: HttpClient,
    credentials: Credentials,
    events: EventService,
}

impl ProfileService {
    pub fn new(http: HttpClient, credentials: Credentials) -> Self {
        let events = EventService::new(http.clone(), credentials.clone());
        Self {
            http,
            credentials,
            events,
        }
    }

    pub async fn get_self(&self) -> Result<UserProfile, ApiError> {
        let headers = authorized(&self.credentials).await?;
        decode(self.http.get("/auth/me", Some(headers)).await, FETCH_PROFILE_FAILED)
    }

    pub async fn my_events(&self) -> Result<Vec<MyEvent>, ApiError> {
        self.events.my_events().await
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        self.events.delete(id).await
    }
}
