//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::{PageQuery, PostRequest};

use super::views;
use crate::middleware::auth::Actor;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=N
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.list(query.page).await?;
    Ok(HttpResponse::Ok().json(views::page(page)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    Actor(principal): Actor,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .create(&principal, views::draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Created().json(views::post(view)))
}

/// GET /api/posts/{id}
pub async fn detail(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = state.posts.detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::detail(detail)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    Actor(principal): Actor,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .update(&principal, path.into_inner(), views::draft(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(views::post(view)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    Actor(principal): Actor,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete(&principal, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
