//! Entry point wiring every service to one HTTP client and one token store.

use anyhow::Result;
use tracing::debug;

use crate::api::HttpClient;
use crate::auth::Credentials;
use crate::config::Config;
use crate::services::{AuthService, EventService, ForumService, NotificationService, ProfileService};

/// Clone is cheap - the HTTP connection pool and the token store are shared.
#[derive(Clone)]
pub struct Townsquare {
    http: HttpClient,
    credentials: Credentials,
    auth: AuthService,
    events: EventService,
    forums: ForumService,
    notifications: NotificationService,
    profile: ProfileService,
}

impl Townsquare {
    pub fn new(http: HttpClient, credentials: Credentials) -> Self {
        Self {
            auth: AuthService::new(http.clone(), credentials.clone()),
            events: EventService::new(http.clone(), credentials.clone()),
            forums: ForumService::new(http.clone(), credentials.clone()),
            notifications: NotificationService::new(http.clone(), credentials.clone()),
            profile: ProfileService::new(http.clone(), credentials.clone()),
            http,
            credentials,
        }
    }

    /// Build from configuration and publish whether a session was persisted.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let http = match config.request_timeout() {
            Some(timeout) => HttpClient::with_timeout(config.base_url(), timeout)?,
            None => HttpClient::new(config.base_url())?,
        };
        let credentials = Credentials::new(config.token_store()?);
        let state = credentials.refresh_state().await?;
        debug!(base_url = config.base_url(), ?state, "Client ready");
        Ok(Self::new(http, credentials))
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn events(&self) -> &EventService {
        &self.events
    }

    pub fn forums(&self) -> &ForumService {
        &self.forums
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    pub fn profile(&self) -> &ProfileService {
        &self.profile
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Absolute URL for an image path returned by the server.
    pub fn asset_url(&self, path: &str) -> String {
        self.http.asset_url(path)
    }
}
