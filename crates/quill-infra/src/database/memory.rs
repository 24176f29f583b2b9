//! In-memory object store - used when no database is configured and in tests.
//!
//! All tables sit behind a single lock, so get-or-create and the delete
//! cascades are atomic with respect to every other store call.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};
use quill_core::search::SearchFilter;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Insertion order; newest last.
    posts: Vec<Post>,
    tags: Vec<Tag>,
    /// (post, tag) links in the order they were added.
    post_tags: Vec<(Uuid, Uuid)>,
    /// Insertion order; oldest first.
    comments: Vec<Comment>,
}

impl Tables {
    fn tags_of(&self, post_id: Uuid) -> Vec<Tag> {
        self.post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, t)| self.tags.iter().find(|tag| tag.id == *t))
            .cloned()
            .collect()
    }

    fn newest_first(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        self.posts.iter().rev().filter(|p| keep(p)).cloned().collect()
    }

    fn remove_post(&mut self, post_id: Uuid) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id != post_id);
        if self.posts.len() == before {
            return false;
        }
        self.comments.retain(|c| c.post_id() != post_id);
        self.post_tags.retain(|(p, _)| *p != post_id);
        true
    }
}

/// In-memory implementation of every repository port.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables.users.values().any(|u| {
            u.id != user.id && (u.username == user.username || u.email == user.email)
        });
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        let owned: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id() == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|c| c.author_id() != id);

        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.posts.iter().position(|p| p.id == post.id) {
            Some(index) => tables.posts[index] = post.clone(),
            None => tables.posts.push(post.clone()),
        }
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.tables.write().await.remove_post(id) {
            Ok(())
        } else {
            Err(RepoError::NotFound)
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.posts.len() as u64)
    }

    async fn search(&self, filter: &SearchFilter) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.newest_first(|p| filter.matches(p, &tables.tags_of(p.id))))
    }

    async fn find_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.newest_first(|p| tables.post_tags.contains(&(p.id, tag_id))))
    }

    async fn find_untagged(&self) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.newest_first(|p| !tables.post_tags.iter().any(|(post, _)| *post == p.id)))
    }

    async fn tags_of(&self, post_id: Uuid) -> Result<Vec<Tag>, RepoError> {
        Ok(self.tables.read().await.tags_of(post_id))
    }

    async fn add_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(RepoError::NotFound);
        }
        for tag_id in tag_ids {
            if !tables.tags.iter().any(|t| t.id == *tag_id) {
                return Err(RepoError::Constraint(format!("unknown tag {tag_id}")));
            }
            if !tables.post_tags.contains(&(post_id, *tag_id)) {
                tables.post_tags.push((post_id, *tag_id));
            }
        }
        Ok(())
    }

    async fn clear_tags(&self, post_id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .post_tags
            .retain(|(p, _)| *p != post_id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn get_or_create(&self, tag_name: &str) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(tag) = tables.tags.iter().find(|t| t.tag_name == tag_name) {
            return Ok(tag.clone());
        }

        let tag = Tag::new(tag_name);
        tracing::debug!(tag = %tag.tag_name, slug = %tag.slug, "Created tag");
        tables.tags.push(tag.clone());
        Ok(tag)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tags
            .iter()
            .filter(|t| t.slug == slug)
            .min_by(|a, b| a.tag_name.cmp(&b.tag_name))
            .cloned())
    }

    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        let mut tags = self.tables.read().await.tags.clone();
        tags.sort_by(|a, b| a.tag_name.cmp(&b.tag_name));
        Ok(tags)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.iter().any(|p| p.id == comment.post_id()) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id()
            )));
        }
        match tables.comments.iter().position(|c| c.id == comment.id) {
            Some(index) => tables.comments[index] = comment.clone(),
            None => tables.comments.push(comment.clone()),
        }
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.post_id() == post_id)
            .cloned()
            .collect())
    }
}
