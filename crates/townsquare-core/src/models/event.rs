use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ImageUpload, MultipartForm};
use crate::utils::{de, format_date, or_placeholder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRange {
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub venue: Option<String>,
    #[serde(rename = "contactNumber", default, deserialize_with = "de::string_or_number")]
    pub contact_number: Option<String>,
    #[serde(rename = "eventDateFrom")]
    pub event_date_from: Option<String>,
    #[serde(rename = "eventDateTo")]
    pub event_date_to: Option<String>,
    #[serde(rename = "totalParticipantsRange")]
    pub total_participants_range: Option<ParticipantRange>,
    #[serde(rename = "eventFee", default, deserialize_with = "de::string_or_number")]
    pub event_fee: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub participants: Vec<Value>,
    #[serde(default, deserialize_with = "de::count")]
    pub likes: u64,
}

impl Event {
    /// Server id, whichever of `_id` / `id` was sent.
    pub fn resource_id(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }

    pub fn display_title(&self) -> &str {
        or_placeholder(self.title.as_deref(), "Untitled Event")
    }

    pub fn display_description(&self) -> &str {
        or_placeholder(self.description.as_deref(), "No description available.")
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// "3/20", or just the count when no maximum is known.
    pub fn participants_summary(&self) -> String {
        match self.total_participants_range {
            Some(range) if range.max > 0 => format!("{}/{}", self.participant_count(), range.max),
            _ => self.participant_count().to_string(),
        }
    }

    pub fn formatted_dates(&self) -> String {
        format!(
            "{} - {}",
            format_date(self.event_date_from.as_deref()),
            format_date(self.event_date_to.as_deref())
        )
    }

    /// Server-relative path of the cover image.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Entry of the caller's own events list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyEvent {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "relativeTime")]
    pub relative_time: Option<String>,
    #[serde(rename = "likesCount", default, deserialize_with = "de::count")]
    pub likes_count: u64,
    #[serde(rename = "participantCount", default, deserialize_with = "de::count")]
    pub participant_count: u64,
}

impl MyEvent {
    pub fn resource_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.object_id.as_deref())
    }
}

/// Input for creating or updating an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub venue: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
    #[serde(rename = "eventDateFrom")]
    pub event_date_from: DateTime<Utc>,
    #[serde(rename = "eventDateTo")]
    pub event_date_to: DateTime<Utc>,
    #[serde(rename = "totalParticipantsRange")]
    pub total_participants_range: ParticipantRange,
    #[serde(rename = "eventFee", default, deserialize_with = "de::string_or_number")]
    pub event_fee: Option<String>,
}

impl EventDraft {
    /// Client-side checks run before any request is issued.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("venue", &self.venue),
            ("contactNumber", &self.contact_number),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(format!("Please fill in all required fields ({} is empty).", name));
        }
        if self.total_participants_range.min > self.total_participants_range.max {
            return Err("Min participants cannot exceed max participants.".to_string());
        }
        Ok(())
    }

    /// Multipart body: every field as text, the range as JSON, then the image.
    pub fn to_form(&self, image: Option<ImageUpload>) -> MultipartForm {
        let range = format!(
            r#"{{"min":{},"max":{}}}"#,
            self.total_participants_range.min, self.total_participants_range.max
        );
        let mut form = MultipartForm::new()
            .text("title", self.title.as_str())
            .text("description", self.description.as_str())
            .text("venue", self.venue.as_str())
            .text("contactNumber", self.contact_number.as_str())
            .text("eventDateFrom", iso_timestamp(&self.event_date_from))
            .text("eventDateTo", iso_timestamp(&self.event_date_to))
            .text("totalParticipantsRange", range);
        if let Some(ref fee) = self.event_fee {
            form = form.text("eventFee", fee.as_str());
        }
        form.image(image)
    }
}

/// `2026-02-06T19:00:00.000Z`
fn iso_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
