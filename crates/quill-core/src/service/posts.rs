use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, Post, PostDraft, Tag};
use crate::error::{DomainError, RepoError};
use crate::guard::post as post_guard;
use crate::ports::{CommentRepository, PostRepository, TagRepository};
use crate::principal::Principal;
use crate::search::SearchFilter;
use crate::tags::resolve_tags;

/// Reserved tag slug listing posts that have no tags.
///
/// A real tag whose slug is `no-tag` is shadowed by this listing.
pub const NO_TAG_SLUG: &str = "no-tag";

/// A post together with its tags.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub tags: Vec<Tag>,
}

/// A post with its tags and comments.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostView,
    pub comments: Vec<Comment>,
}

/// Posts listed under a tag slug. `tag` is `None` for the untagged listing.
#[derive(Debug, Clone)]
pub struct TagListing {
    pub tag: Option<Tag>,
    pub posts: Vec<PostView>,
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Post workflows: listing, search and guarded create/update/delete.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    page_size: u64,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
        page_size: u64,
    ) -> Self {
        Self {
            posts,
            tags,
            comments,
            page_size: page_size.max(1),
        }
    }

    /// Newest posts first, `page` counted from 1.
    pub async fn list(&self, page: u64) -> Result<Page<PostView>, DomainError> {
        if page == 0 {
            return Err(DomainError::Validation("page numbers start at 1".to_string()));
        }

        let total = self.posts.count().await?;
        let total_pages = total.div_ceil(self.page_size).max(1);
        if page > total_pages {
            return Err(DomainError::not_found("page", page));
        }

        let posts = self
            .posts
            .list((page - 1) * self.page_size, self.page_size)
            .await?;

        Ok(Page {
            items: self.views(posts).await?,
            page,
            per_page: self.page_size,
            total,
            total_pages,
        })
    }

    pub async fn detail(&self, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.load(post_id).await?;
        let comments = self.comments.find_by_post(post_id).await?;
        Ok(PostDetail {
            post: self.view(post).await?,
            comments,
        })
    }

    /// Posts carrying the tag with `slug`, or untagged posts for [`NO_TAG_SLUG`].
    pub async fn by_tag(&self, slug: &str) -> Result<TagListing, DomainError> {
        if slug == NO_TAG_SLUG {
            let posts = self.posts.find_untagged().await?;
            return Ok(TagListing {
                tag: None,
                posts: self.views(posts).await?,
            });
        }

        let tag = self
            .tags
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("tag", slug))?;
        let posts = self.posts.find_by_tag(tag.id).await?;

        Ok(TagListing {
            tag: Some(tag),
            posts: self.views(posts).await?,
        })
    }

    /// Unpaginated search over title, content and tag names.
    pub async fn search(&self, query: &str) -> Result<Vec<PostView>, DomainError> {
        let filter = SearchFilter::new(query);
        let posts = self.posts.search(&filter).await?;
        tracing::debug!(query, hits = posts.len(), "Post search");
        self.views(posts).await
    }

    pub async fn all_tags(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.all().await?)
    }

    /// Create a post authored by `principal`. Tags are resolved before anything
    /// is written.
    pub async fn create(
        &self,
        principal: &Principal,
        draft: PostDraft,
    ) -> Result<PostView, DomainError> {
        post_guard::can_create(principal)
            .ensure("write posts")
            .inspect_err(|e| tracing::warn!(user_id = ?principal.id(), error = %e, "Post creation denied"))?;
        let author_id = principal.id().ok_or(DomainError::Unauthenticated)?;
        validate(&draft)?;
        let tags = resolve_tags(self.tags.as_ref(), draft.tags.as_deref()).await?;

        let post = self.posts.save(Post::new(author_id, &draft)).await?;
        self.posts.add_tags(post.id, &ids(&tags)).await?;

        tracing::info!(post_id = %post.id, user_id = %author_id, tags = tags.len(), "Post created");
        Ok(PostView { post, tags })
    }

    /// Replace a post's fields and its whole tag set. Tags are resolved before
    /// the post is touched.
    pub async fn update(
        &self,
        principal: &Principal,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<PostView, DomainError> {
        let mut post = self.load(post_id).await?;
        post_guard::can_mutate(principal, &post)
            .ensure("update this post")
            .inspect_err(|e| tracing::warn!(user_id = ?principal.id(), post_id = %post_id, error = %e, "Post update denied"))?;
        validate(&draft)?;
        let tags = resolve_tags(self.tags.as_ref(), draft.tags.as_deref()).await?;

        post.apply(&draft);
        let post = self.posts.save(post).await?;

        self.posts.clear_tags(post.id).await?;
        self.posts.add_tags(post.id, &ids(&tags)).await?;

        tracing::info!(post_id = %post.id, tags = tags.len(), "Post updated");
        Ok(PostView { post, tags })
    }

    /// Delete a post. Its comments and tag links go with it.
    pub async fn delete(&self, principal: &Principal, post_id: Uuid) -> Result<(), DomainError> {
        let post = self.load(post_id).await?;
        post_guard::can_delete(principal, &post)
            .ensure("delete this post")
            .inspect_err(|e| tracing::warn!(user_id = ?principal.id(), post_id = %post_id, error = %e, "Post deletion denied"))?;

        self.posts.delete(post_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("post", post_id),
            other => other.into(),
        })?;

        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    async fn load(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn view(&self, post: Post) -> Result<PostView, DomainError> {
        let tags = self.posts.tags_of(post.id).await?;
        Ok(PostView { post, tags })
    }

    async fn views(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.view(post).await?);
        }
        Ok(views)
    }
}

fn validate(draft: &PostDraft) -> Result<(), DomainError> {
    if draft.title.trim().is_empty() {
        return Err(DomainError::Validation("title is required".to_string()));
    }
    Ok(())
}

fn ids(tags: &[Tag]) -> Vec<Uuid> {
    tags.iter().map(|t| t.id).collect()
}
