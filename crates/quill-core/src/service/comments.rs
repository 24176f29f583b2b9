use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Comment;
use crate::error::{DomainError, RepoError};
use crate::guard::comment as comment_guard;
use crate::ports::{CommentRepository, PostRepository};
use crate::principal::Principal;

/// Comment workflows. Post and author of a comment are always assigned here.
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    pub async fn create(
        &self,
        principal: &Principal,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        comment_guard::can_create(principal)
            .ensure("comment")
            .inspect_err(|e| tracing::warn!(post_id = %post_id, error = %e, "Comment creation denied"))?;
        let author_id = principal.id().ok_or(DomainError::Unauthenticated)?;
        let content = validate(content)?;

        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))?;

        let comment = self
            .comments
            .save(Comment::new(post.id, author_id, content))
            .await?;

        tracing::info!(comment_id = %comment.id, post_id = %post.id, "Comment created");
        Ok(comment)
    }

    pub async fn update(
        &self,
        principal: &Principal,
        comment_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        let mut comment = self.load(comment_id).await?;
        comment_guard::can_mutate(principal, &comment)
            .ensure("edit this comment")
            .inspect_err(|e| tracing::warn!(user_id = ?principal.id(), comment_id = %comment_id, error = %e, "Comment update denied"))?;

        comment.edit(validate(content)?);
        Ok(self.comments.save(comment).await?)
    }

    /// Delete a comment, returning the post it belonged to.
    pub async fn delete(&self, principal: &Principal, comment_id: Uuid) -> Result<Uuid, DomainError> {
        let comment = self.load(comment_id).await?;
        comment_guard::can_delete(principal, &comment)
            .ensure("delete this comment")
            .inspect_err(|e| tracing::warn!(user_id = ?principal.id(), comment_id = %comment_id, error = %e, "Comment deletion denied"))?;

        self.comments.delete(comment_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("comment", comment_id),
            other => other.into(),
        })?;

        tracing::info!(comment_id = %comment_id, "Comment deleted");
        Ok(comment.post_id())
    }

    async fn load(&self, comment_id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }
}

fn validate(content: String) -> Result<String, DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation("comment content is required".to_string()));
    }
    Ok(content)
}
