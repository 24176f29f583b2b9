//! Access gate: runs a guard predicate before the wrapped handler.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use quill_core::Principal;
use quill_core::guard::Decision;

use crate::middleware::auth::resolve_principal;
use crate::middleware::error::AppError;

/// A guard that needs nothing but the acting principal.
pub type PrincipalGuard = fn(&Principal) -> Decision;

/// Middleware factory rejecting requests whose principal fails `guard`.
///
/// The resolved principal is cached in the request extensions, so the
/// handler's [`Actor`](crate::middleware::auth::Actor) extractor reuses it.
#[derive(Clone, Copy)]
pub struct Gate {
    guard: PrincipalGuard,
    action: &'static str,
}

impl Gate {
    pub fn new(action: &'static str, guard: PrincipalGuard) -> Self {
        Self { guard, action }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Gate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = GateMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GateMiddleware {
            service: Rc::new(service),
            gate: *self,
        }))
    }
}

pub struct GateMiddleware<S> {
    service: Rc<S>,
    gate: Gate,
}

impl<S, B> Service<ServiceRequest> for GateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let Gate { guard, action } = self.gate;

        Box::pin(async move {
            let verdict = resolve_principal(req.request().clone())
                .await
                .and_then(|principal| {
                    guard(&principal).ensure(action).map_err(|e| {
                        tracing::warn!(
                            user_id = ?principal.id(),
                            path = %req.path(),
                            error = %e,
                            "Gate denied request"
                        );
                        AppError::from(e)
                    })
                });

            match verdict {
                Ok(()) => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    let response = err.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
