//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base address, where the session token is kept, an optional
//! request timeout, and the last email used to log in.
//!
//! Configuration is stored at `~/.config/townsquare/config.json`. The
//! `TOWNSQUARE_API_URL` and `TOWNSQUARE_CREDENTIAL_BACKEND` environment
//! variables override the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::http::DEFAULT_BASE_URL;
use crate::auth::{FileStore, KeyringStore, TokenStore};

/// Application name used for config directory paths
const APP_NAME: &str = "townsquare";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Session file name in the config directory
const SESSION_FILE: &str = "session.json";

pub const ENV_API_URL: &str = "TOWNSQUARE_API_URL";
pub const ENV_CREDENTIAL_BACKEND: &str = "TOWNSQUARE_CREDENTIAL_BACKEND";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// OS keychain
    Keyring,
    /// `session.json` next to the config file
    #[default]
    File,
}

impl std::str::FromStr for CredentialBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" | "keychain" => Ok(CredentialBackend::Keyring),
            "file" => Ok(CredentialBackend::File),
            other => Err(anyhow::anyhow!("Unknown credential backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub credential_backend: Option<CredentialBackend>,
    pub request_timeout_secs: Option<u64>,
    pub last_email: Option<String>,
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Record the email of the last login in the config file.
    ///
    /// Reads the file again so environment overrides are not written back.
    pub fn remember_email(email: &str) -> Result<()> {
        let path = Self::config_path()?;
        let mut stored = Self::load_from(&path)?;
        stored.last_email = Some(email.to_string());
        stored.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Overlay values from `lookup` (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(backend) = lookup(ENV_CREDENTIAL_BACKEND).filter(|v| !v.trim().is_empty()) {
            self.credential_backend = Some(
                backend
                    .parse()
                    .with_context(|| format!("Invalid {}", ENV_CREDENTIAL_BACKEND))?,
            );
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn backend(&self) -> CredentialBackend {
        self.credential_backend.unwrap_or_default()
    }

    /// Per-request timeout, only when one is configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn session_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(SESSION_FILE))
    }

    /// Token store for the configured backend.
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        Ok(match self.backend() {
            CredentialBackend::Keyring => {
                Arc::new(KeyringStore::new().context("Failed to open keychain entry")?)
            }
            CredentialBackend::File => Arc::new(FileStore::new(Self::session_path()?)),
        })
    }
}
