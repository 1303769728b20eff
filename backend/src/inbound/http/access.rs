//! Access-control middleware running the route's stage list.
//!
//! Wrap a `web::resource` so path parameters are already matched:
//!
//! ```text
//! DELETE /photos/{photoId}  ->  authenticate -> authorize(photo) -> handler
//! ```
//!
//! On success the [`CallerIdentity`] is stored in the request extensions and
//! read back by the [`super::caller::Caller`] extractor. On the first failing
//! stage the error response is returned and the wrapped service is never
//! called.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error as ActixError, HttpMessage, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use super::bearer::bearer_credential;
use crate::domain::auth::{AccessPipeline, AccessRequest, RoutePolicy};
use crate::domain::{CallerIdentity, ResourceId};

/// Middleware factory binding a [`RoutePolicy`] to an [`AccessPipeline`].
///
/// # Examples
/// ```ignore
/// use actix_web::web;
/// use access_pipeline::domain::auth::RoutePolicy;
/// use access_pipeline::domain::ResourceKind;
/// use access_pipeline::inbound::http::access::AccessControl;
///
/// let resource = web::resource("/photos/{photoId}")
///     .wrap(AccessControl::new(pipeline, RoutePolicy::owner_of(ResourceKind::Photo)));
/// ```
#[derive(Clone)]
pub struct AccessControl {
    pipeline: AccessPipeline,
    policy: Rc<RoutePolicy>,
}

impl AccessControl {
    pub fn new(pipeline: AccessPipeline, policy: RoutePolicy) -> Self {
        Self {
            pipeline,
            policy: Rc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type InitError = ();
    type Transform = AccessControlMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessControlMiddleware {
            service: Rc::new(service),
            pipeline: self.pipeline.clone(),
            policy: Rc::clone(&self.policy),
        }))
    }
}

/// Service wrapper produced by [`AccessControl`].
pub struct AccessControlMiddleware<S> {
    service: Rc<S>,
    pipeline: AccessPipeline,
    policy: Rc<RoutePolicy>,
}

impl<S, B> Service<ServiceRequest> for AccessControlMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let pipeline = self.pipeline.clone();
        let policy = Rc::clone(&self.policy);

        Box::pin(async move {
            let resource_id = ResourceId::from_path_segment(
                policy
                    .resource_kind()
                    .and_then(|kind| req.match_info().get(kind.path_param())),
            );
            let credential = bearer_credential(req.headers()).map(str::to_owned);
            let request = AccessRequest::new(credential.as_deref(), resource_id);

            match pipeline.admit(&policy, request).await {
                Ok(caller) => {
                    req.extensions_mut().insert::<CallerIdentity>(caller);
                    let response = service.call(req).await?;
                    Ok(response.map_into_left_body())
                }
                Err(error) => {
                    debug!(
                        path = %req.path(),
                        kind = %error.kind(),
                        "access pipeline rejected request"
                    );
                    let response = error.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests;
