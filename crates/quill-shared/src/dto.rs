//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Response containing the bearer token of a freshly opened session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Body for creating or editing a post.
///
/// `tags` is free text separated by `;` or `,`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub head_image: Option<String>,
    #[serde(default)]
    pub file_upload: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub head_image: Option<String>,
    pub file_upload: Option<String>,
    pub author_id: Uuid,
    pub tags: Vec<TagResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post together with its comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string for paginated listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u64,
}

fn first_page() -> u64 {
    1
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: first_page() }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Posts filed under a tag. `tag` is absent for the untagged listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagPostsResponse {
    pub tag: Option<TagResponse>,
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub posts: Vec<PostResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults_to_first_page() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
    }

    #[test]
    fn post_request_only_needs_a_title() {
        let req: PostRequest = serde_json::from_str(r#"{"title":"hi"}"#).unwrap();
        assert_eq!(req.title, "hi");
        assert!(req.content.is_empty());
        assert!(req.tags.is_none());
    }

    #[test]
    fn detail_flattens_post_fields() {
        let now = Utc::now();
        let detail = PostDetailResponse {
            post: PostResponse {
                id: Uuid::nil(),
                title: "t".to_string(),
                content: String::new(),
                head_image: None,
                file_upload: None,
                author_id: Uuid::nil(),
                tags: vec![],
                created_at: now,
                updated_at: now,
            },
            comments: vec![],
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["title"], "t");
        assert!(value["comments"].as_array().unwrap().is_empty());
    }
}
