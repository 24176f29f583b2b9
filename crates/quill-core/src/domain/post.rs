use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post owned by its author.
///
/// Tag associations are not stored on the post itself; they live in the
/// store's ordered post/tag relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub head_image: Option<String>,
    pub file_upload: Option<String>,
    author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-editable fields of a post.
///
/// The author is not part of the draft; it always comes from the acting
/// principal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub head_image: Option<String>,
    pub file_upload: Option<String>,
    /// Raw tag input, `;` or `,` separated.
    pub tags: Option<String>,
}

impl Post {
    /// Create a new post authored by `author_id`.
    pub fn new(author_id: Uuid, draft: &PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            head_image: draft.head_image.clone(),
            file_upload: draft.file_upload.clone(),
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a post from stored fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        author_id: Uuid,
        title: String,
        content: String,
        head_image: Option<String>,
        file_upload: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            content,
            head_image,
            file_upload,
            author_id,
            created_at,
            updated_at,
        }
    }

    pub fn author_id(&self) -> Uuid {
        self.author_id
    }

    /// Replace the editable fields. The author is untouched.
    pub fn apply(&mut self, draft: &PostDraft) {
        self.title = draft.title.clone();
        self.content = draft.content.clone();
        self.head_image = draft.head_image.clone();
        self.file_upload = draft.file_upload.clone();
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_author() {
        let author = Uuid::new_v4();
        let mut post = Post::new(
            author,
            &PostDraft {
                title: "first".to_string(),
                ..Default::default()
            },
        );

        post.apply(&PostDraft {
            title: "second".to_string(),
            content: "body".to_string(),
            head_image: Some("head.png".to_string()),
            ..Default::default()
        });

        assert_eq!(post.author_id(), author);
        assert_eq!(post.title, "second");
        assert_eq!(post.head_image.as_deref(), Some("head.png"));
    }
}
