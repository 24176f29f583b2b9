//! Registration, login and session handlers.

use actix_web::{HttpResponse, web};

use quill_core::service::Registration;
use quill_shared::dto::{LoginRequest, RegisterUserRequest};

use super::views;
use crate::middleware::auth::Actor;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
///
/// Creates the account and logs it straight in.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .accounts
        .register(Registration {
            username: req.username,
            email: req.email,
            password: req.password.clone(),
        })
        .await?;
    let outcome = state.accounts.login(&user.username, &req.password).await?;

    Ok(HttpResponse::Created().json(views::auth(outcome)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let outcome = state.accounts.login(&req.username, &req.password).await?;

    Ok(HttpResponse::Ok().json(views::auth(outcome)))
}

/// POST /api/auth/logout
pub async fn logout(state: web::Data<AppState>, Actor(principal): Actor) -> AppResult<HttpResponse> {
    state.accounts.logout(&principal).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, Actor(principal): Actor) -> AppResult<HttpResponse> {
    let user = state.accounts.profile(&principal).await?;
    Ok(HttpResponse::Ok().json(views::user(user)))
}
