use serde_json::json;
use tracing::{debug, info};

use crate::api::{ApiError, HttpClient, ImageUpload, MultipartForm, RequestBody};
use crate::auth::Credentials;
use crate::models::Forum;
use crate::utils::de::count_value;
use crate::utils::or_placeholder;

use super::{authorized, check_id, check_present, decode};

/// File name used when an upload arrives without one.
pub const FORUM_IMAGE_NAME: &str = "forum_image.jpg";

const FETCH_FORUMS_FAILED: &str = "Failed to fetch forums.";
const FETCH_FORUM_FAILED: &str = "Failed to fetch forum details.";
const CREATE_FAILED: &str = "Failed to create forum post.";
const LIKE_FAILED: &str = "Failed to like the forum post.";
const COMMENT_FAILED: &str = "Failed to add a comment.";

#[derive(Clone)]
pub struct ForumService {
    http: HttpClient,
    credentials: Credentials,
}

impl ForumService {
    pub fn new(http: HttpClient, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    pub async fn list(&self) -> Result<Vec<Forum>, ApiError> {
        decode(self.http.get("/forums", None).await, FETCH_FORUMS_FAILED)
    }

    /// Full post including its comments.
    pub async fn get_by_id(&self, id: &str) -> Result<Forum, ApiError> {
        let id = check_id(id, "forum")?;
        debug!(forum_id = id, "Fetching forum details");
        decode(
            self.http.get(&format!("/forums/{}", id), None).await,
            FETCH_FORUM_FAILED,
        )
    }

    /// Blank title or content are sent as "Untitled" / "No content".
    pub async fn create(
        &self,
        title: &str,
        content: &str,
        image: Option<ImageUpload>,
    ) -> Result<Forum, ApiError> {
        let headers = authorized(&self.credentials).await?;

        let image = image.map(|i| {
            if i.file_name.trim().is_empty() {
                i.renamed(FORUM_IMAGE_NAME)
            } else {
                i
            }
        });
        let form = MultipartForm::new()
            .text("title", or_placeholder(Some(title), "Untitled"))
            .text("content", or_placeholder(Some(content), "No content"))
            .image(image);

        let forum: Forum = decode(
            self.http
                .post("/forums", RequestBody::Multipart(form), Some(headers))
                .await,
            CREATE_FAILED,
        )?;
        info!(forum_id = forum.resource_id().unwrap_or("-"), "Forum post created");
        Ok(forum)
    }

    /// Returns the like count after the server applied the like.
    pub async fn like(&self, id: &str) -> Result<u64, ApiError> {
        let id = check_id(id, "forum")?;
        let headers = authorized(&self.credentials).await?;
        debug!(forum_id = id, "Liking forum post");

        let response = self
            .http
            .post(&format!("/forums/{}/like", id), RequestBody::Json(json!({})), Some(headers))
            .await
            .map_err(|e| ApiError::from_http(e, LIKE_FAILED))?;

        response
            .body
            .get("likes")
            .and_then(count_value)
            .ok_or_else(|| ApiError::InvalidResponse(LIKE_FAILED.to_string()))
    }

    pub async fn add_comment(&self, id: &str, text: &str) -> Result<Forum, ApiError> {
        let id = check_id(id, "forum")?;
        check_present(text, "Comment cannot be empty.")?;
        let headers = authorized(&self.credentials).await?;

        decode(
            self.http
                .post(
                    &format!("/forums/{}/comment", id),
                    RequestBody::Json(json!({ "text": text })),
                    Some(headers),
                )
                .await,
            COMMENT_FAILED,
        )
    }
}
