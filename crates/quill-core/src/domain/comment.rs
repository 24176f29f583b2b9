use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - attached to a post, owned by its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a comment from stored fields.
    pub fn from_parts(
        id: Uuid,
        post_id: Uuid,
        author_id: Uuid,
        content: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            author_id,
            content,
            created_at,
            updated_at,
        }
    }

    pub fn post_id(&self) -> Uuid {
        self.post_id
    }

    pub fn author_id(&self) -> Uuid {
        self.author_id
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}
