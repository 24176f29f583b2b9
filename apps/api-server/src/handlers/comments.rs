//! Comment handlers.

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use quill_shared::dto::CommentRequest;

use super::views;
use crate::middleware::auth::Actor;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{id}/comments
pub async fn create(
    state: web::Data<AppState>,
    Actor(principal): Actor,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .create(&principal, path.into_inner(), body.into_inner().content)
        .await?;

    Ok(HttpResponse::Created().json(views::comment(comment)))
}

/// PUT /api/comments/{id}
pub async fn update(
    state: web::Data<AppState>,
    Actor(principal): Actor,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .update(&principal, path.into_inner(), body.into_inner().content)
        .await?;

    Ok(HttpResponse::Ok().json(views::comment(comment)))
}

/// DELETE /api/comments/{id}
///
/// Redirects to the post the comment belonged to.
pub async fn delete(
    state: web::Data<AppState>,
    Actor(principal): Actor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = state.comments.delete(&principal, path.into_inner()).await?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/api/posts/{post_id}")))
        .finish())
}
