use serde::{Deserialize, Serialize};

use crate::utils::format_date;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "eventName")]
    pub event_name: Option<String>,
    #[serde(rename = "eventDate")]
    pub event_date: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    pub message: Option<String>,
}

impl Notification {
    pub fn formatted_event_date(&self) -> String {
        format_date(self.event_date.as_deref())
    }

    pub fn formatted_created_at(&self) -> String {
        format_date(self.created_at.as_deref())
    }
}
