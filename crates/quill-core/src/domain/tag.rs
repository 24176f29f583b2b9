use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tags::slugify;

/// Tag entity - unique by name, addressed in URLs by its slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub tag_name: String,
    pub slug: String,
}

impl Tag {
    /// Create a tag for `tag_name`, deriving its slug.
    pub fn new(tag_name: impl Into<String>) -> Self {
        let tag_name = tag_name.into();
        let slug = slugify(&tag_name);
        Self {
            id: Uuid::new_v4(),
            tag_name,
            slug,
        }
    }
}
