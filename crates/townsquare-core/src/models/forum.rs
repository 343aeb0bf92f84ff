use serde::{Deserialize, Serialize};

use crate::utils::{de, format_datetime, or_placeholder};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Creator {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub body: String,
    pub creator: Option<Creator>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl Comment {
    pub fn author_name(&self) -> &str {
        author_or_anonymous(self.creator.as_ref())
    }

    pub fn formatted_created_at(&self) -> String {
        format_datetime(self.created_at.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forum {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub creator: Option<Creator>,
    #[serde(rename = "createdDate")]
    pub created_date: Option<String>,
    // detail responses send the liker ids, summaries send totalLikes
    #[serde(default, deserialize_with = "de::count")]
    pub likes: u64,
    #[serde(rename = "totalLikes", default, deserialize_with = "de::count")]
    pub total_likes: u64,
    #[serde(rename = "totalComments", default, deserialize_with = "de::count")]
    pub total_comments: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Forum {
    pub fn resource_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.object_id.as_deref())
    }

    pub fn display_title(&self) -> &str {
        or_placeholder(self.title.as_deref(), "Untitled")
    }

    pub fn author_name(&self) -> &str {
        author_or_anonymous(self.creator.as_ref())
    }

    pub fn like_count(&self) -> u64 {
        self.likes.max(self.total_likes)
    }

    pub fn comment_count(&self) -> u64 {
        self.total_comments.max(self.comments.len() as u64)
    }
}

fn author_or_anonymous(creator: Option<&Creator>) -> &str {
    or_placeholder(creator.and_then(|c| c.name.as_deref()), "Anonymous")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forum_summary() {
        let json = r#"{"id":"f1","title":"Welcome","content":"Hi all","createdDate":"Jan 5","creator":{"name":"Dana"},"totalLikes":4,"totalComments":2}"#;
        let forum: Forum = serde_json::from_str(json).unwrap();
        assert_eq!(forum.resource_id(), Some("f1"));
        assert_eq!(forum.author_name(), "Dana");
        assert_eq!(forum.like_count(), 4);
        assert_eq!(forum.comment_count(), 2);
    }

    #[test]
    fn test_parse_forum_detail_with_comments() {
        let json = r#"{"_id":"f2","likes":["u1","u2"],"comments":[{"id":1,"body":"Nice","createdAt":"2026-02-06T19:00:00Z"},{"id":"c2","body":"Agreed","creator":{"name":"Lee"}}]}"#;
        let forum: Forum = serde_json::from_str(json).unwrap();
        assert_eq!(forum.resource_id(), Some("f2"));
        assert_eq!(forum.display_title(), "Untitled");
        assert_eq!(forum.author_name(), "Anonymous");
        assert_eq!(forum.like_count(), 2);
        assert_eq!(forum.comment_count(), 2);

        let first = &forum.comments[0];
        assert_eq!(first.id.as_deref(), Some("1"));
        assert_eq!(first.author_name(), "Anonymous");
        assert_eq!(first.formatted_created_at(), "Feb 06, 2026 @ 07:00 PM");
        assert_eq!(forum.comments[1].author_name(), "Lee");
    }
}
