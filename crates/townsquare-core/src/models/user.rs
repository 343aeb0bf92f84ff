use serde::{Deserialize, Serialize};

use crate::utils::{de, format_date};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl UserProfile {
    pub fn joined(&self) -> String {
        format_date(self.created_at.as_deref())
    }
}

/// Sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), String> {
        if self.full_name.trim().is_empty() {
            return Err("Full name is required.".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required.".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required.".to_string());
        }
        Ok(())
    }
}
