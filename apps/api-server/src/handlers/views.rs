//! Domain → wire conversions.

use quill_core::domain::{Comment, PostDraft, Tag, User};
use quill_core::service::{LoginOutcome, Page, PostDetail, PostView, TagListing};
use quill_shared::dto::{
    AuthResponse, CommentResponse, PageResponse, PostDetailResponse, PostRequest, PostResponse,
    TagPostsResponse, TagResponse, UserResponse,
};

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        is_active: user.is_active,
        created_at: user.created_at,
    }
}

pub fn auth(outcome: LoginOutcome) -> AuthResponse {
    AuthResponse {
        access_token: outcome.token,
        token_type: "Bearer".to_string(),
        expires_in: outcome.expires_in.max(0) as u64,
        user: user(outcome.user),
    }
}

pub fn tag(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.tag_name,
        slug: tag.slug,
    }
}

pub fn post(view: PostView) -> PostResponse {
    let PostView { post, tags } = view;
    PostResponse {
        id: post.id,
        author_id: post.author_id(),
        title: post.title,
        content: post.content,
        head_image: post.head_image,
        file_upload: post.file_upload,
        tags: tags.into_iter().map(tag).collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn posts(views: Vec<PostView>) -> Vec<PostResponse> {
    views.into_iter().map(post).collect()
}

pub fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id(),
        author_id: comment.author_id(),
        content: comment.content,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub fn detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.post),
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}

pub fn page(page: Page<PostView>) -> PageResponse<PostResponse> {
    PageResponse {
        items: posts(page.items),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        total_pages: page.total_pages,
    }
}

pub fn tag_listing(listing: TagListing) -> TagPostsResponse {
    TagPostsResponse {
        tag: listing.tag.map(tag),
        posts: posts(listing.posts),
    }
}

pub fn draft(req: PostRequest) -> PostDraft {
    PostDraft {
        title: req.title,
        content: req.content,
        head_image: req.head_image,
        file_upload: req.file_upload,
        tags: req.tags,
    }
}
