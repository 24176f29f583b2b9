//! Self-service account handlers.

use actix_web::{HttpResponse, http::header, web};

use crate::middleware::auth::Actor;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// DELETE /api/account
///
/// Deletes the caller's account (with its posts and comments), ends every
/// session it had, and redirects to the landing page.
pub async fn delete_account(
    state: web::Data<AppState>,
    Actor(principal): Actor,
) -> AppResult<HttpResponse> {
    state.accounts.delete_self(&principal).await?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, state.landing_path.as_str()))
        .finish())
}
