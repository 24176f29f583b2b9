//! Tag and search handlers.

use actix_web::{HttpResponse, web};

use quill_shared::dto::SearchResponse;

use super::views;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.posts.all_tags().await?;
    Ok(HttpResponse::Ok().json(tags.into_iter().map(views::tag).collect::<Vec<_>>()))
}

/// GET /api/tags/{slug}/posts
///
/// The slug `no-tag` lists posts without any tag.
pub async fn posts(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let listing = state.posts.by_tag(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(views::tag_listing(listing)))
}

/// GET /api/search/{q}
pub async fn search(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let query = path.into_inner();
    let hits = state.posts.search(&query).await?;

    Ok(HttpResponse::Ok().json(SearchResponse {
        query,
        total: hits.len(),
        posts: views::posts(hits),
    }))
}
