//! Typed access to the caller admitted by the access middleware.

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use tracing::error;

use crate::domain::{CallerIdentity, Error};

/// Extractor yielding the [`CallerIdentity`] produced by authentication.
///
/// Only valid on routes wrapped in
/// [`AccessControl`](super::access::AccessControl); elsewhere extraction
/// fails with an internal error because the route table is misconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub CallerIdentity);

impl Caller {
    pub fn into_inner(self) -> CallerIdentity {
        self.0
    }
}

impl Deref for Caller {
    type Target = CallerIdentity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let caller = req.extensions().get::<CallerIdentity>().copied();
        ready(caller.map(Self).ok_or_else(|| {
            error!(path = %req.path(), "caller requested on a route without access control");
            Error::opaque_internal()
        }))
    }
}
