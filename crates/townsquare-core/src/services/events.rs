use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::{ApiError, HttpClient, ImageUpload, RequestBody};
use crate::auth::Credentials;
use crate::models::{Event, EventDraft, MyEvent};
use crate::utils::de::count_value;

use super::{authorized, check_id, decode};

/// File name every event image is uploaded under.
pub const EVENT_IMAGE_NAME: &str = "event_image.jpg";

const FETCH_EVENTS_FAILED: &str = "Failed to fetch events.";
const FETCH_EVENT_FAILED: &str = "Failed to fetch event details.";
const LIKE_FAILED: &str = "Failed to like the event.";
const JOIN_FAILED: &str = "Failed to join the event.";
const CANCEL_FAILED: &str = "Failed to cancel participation.";
const CREATE_FAILED: &str = "Failed to create event.";
const UPDATE_FAILED: &str = "Failed to update event.";
const MY_EVENTS_FAILED: &str = "Failed to fetch user events.";
const DELETE_FAILED: &str = "Failed to delete event.";

#[derive(Clone)]
pub struct EventService {
    http: HttpClient,
    credentials: Credentials,
}

impl EventService {
    pub fn new(http: HttpClient, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    pub async fn list(&self) -> Result<Vec<Event>, ApiError> {
        decode(self.http.get("/events", None).await, FETCH_EVENTS_FAILED)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Event, ApiError> {
        let id = check_id(id, "event")?;
        debug!(event_id = id, "Fetching event details");
        decode(
            self.http.get(&format!("/events/{}", id), None).await,
            FETCH_EVENT_FAILED,
        )
    }

    /// Returns the like count after the server applied the like.
    ///
    /// Whether repeating this toggles or increments is up to the server.
    pub async fn like(&self, id: &str) -> Result<u64, ApiError> {
        let id = check_id(id, "event")?;
        let headers = authorized(&self.credentials).await?;
        debug!(event_id = id, "Liking event");

        let response = self
            .http
            .post(&format!("/events/{}/like", id), RequestBody::Json(json!({})), Some(headers))
            .await
            .map_err(|e| ApiError::from_http(e, LIKE_FAILED))?;

        response
            .body
            .get("likes")
            .and_then(count_value)
            .ok_or_else(|| ApiError::InvalidResponse(LIKE_FAILED.to_string()))
    }

    pub async fn join(&self, id: &str) -> Result<Value, ApiError> {
        self.participation(id, "join", JOIN_FAILED).await
    }

    pub async fn cancel(&self, id: &str) -> Result<Value, ApiError> {
        self.participation(id, "cancel", CANCEL_FAILED).await
    }

    async fn participation(&self, id: &str, action: &str, fallback: &str) -> Result<Value, ApiError> {
        let id = check_id(id, "event")?;
        let headers = authorized(&self.credentials).await?;
        debug!(event_id = id, action, "Updating participation");

        decode(
            self.http
                .post(&format!("/events/{}/{}", id, action), RequestBody::Json(json!({})), Some(headers))
                .await,
            fallback,
        )
    }

    /// Create an event as a single multipart request.
    pub async fn create(&self, draft: &EventDraft, image: Option<ImageUpload>) -> Result<Event, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        let headers = authorized(&self.credentials).await?;

        let form = draft.to_form(image.map(|i| i.renamed(EVENT_IMAGE_NAME)));
        let event: Event = decode(
            self.http
                .post("/events", RequestBody::Multipart(form), Some(headers))
                .await,
            CREATE_FAILED,
        )?;
        info!(event_id = event.resource_id().unwrap_or("-"), "Event created");
        Ok(event)
    }

    pub async fn update(
        &self,
        id: &str,
        draft: &EventDraft,
        image: Option<ImageUpload>,
    ) -> Result<Event, ApiError> {
        let id = check_id(id, "event")?;
        draft.validate().map_err(ApiError::Validation)?;
        let headers = authorized(&self.credentials).await?;

        let form = draft.to_form(image.map(|i| i.renamed(EVENT_IMAGE_NAME)));
        let event = decode(
            self.http
                .put(&format!("/events/{}", id), RequestBody::Multipart(form), Some(headers))
                .await,
            UPDATE_FAILED,
        )?;
        info!(event_id = id, "Event updated");
        Ok(event)
    }

    /// Events created by the logged-in user.
    pub async fn my_events(&self) -> Result<Vec<MyEvent>, ApiError> {
        let headers = authorized(&self.credentials).await?;
        decode(
            self.http
                .post("/events/myevents", RequestBody::Json(json!({})), Some(headers))
                .await,
            MY_EVENTS_FAILED,
        )
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let id = check_id(id, "event")?;
        let headers = authorized(&self.credentials).await?;

        self.http
            .delete(&format!("/events/{}", id), Some(headers))
            .await
            .map_err(|e| ApiError::from_http(e, DELETE_FAILED))?;
        info!(event_id = id, "Event deleted");
        Ok(())
    }
}
