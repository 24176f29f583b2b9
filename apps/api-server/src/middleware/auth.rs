//! Principal extraction from bearer tokens.

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header, web};
use std::future::Future;
use std::pin::Pin;

use quill_core::Principal;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The acting principal of a request. Never fails for anonymous callers;
/// authorization is decided by guards, not by extraction.
///
/// ```ignore
/// async fn me(Actor(principal): Actor) -> impl Responder { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Actor(pub Principal);

/// The token from an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Resolve (once per request) the principal behind the request's token.
pub async fn resolve_principal(req: HttpRequest) -> Result<Principal, AppError> {
    let cached = req.extensions().get::<Principal>().cloned();
    if let Some(principal) = cached {
        return Ok(principal);
    }

    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("AppState not found in app data".to_string()))?;

    let token = bearer_token(&req);
    let principal = state.accounts.resolve(token.as_deref()).await?;
    req.extensions_mut().insert(principal.clone());

    Ok(principal)
}

impl FromRequest for Actor {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve_principal(req).await.map(Actor) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn extracts_bearer_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc.def"));
    }

    #[test]
    fn ignores_other_schemes_and_empty_tokens() {
        let basic = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic dXNlcg=="))
            .to_http_request();
        let empty = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_http_request();

        assert!(bearer_token(&basic).is_none());
        assert!(bearer_token(&empty).is_none());
        assert!(bearer_token(&TestRequest::default().to_http_request()).is_none());
    }
}
