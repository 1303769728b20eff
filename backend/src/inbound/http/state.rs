//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` so they depend only on domain
//! services and ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::RegistrationService;
use crate::domain::auth::{AccessPipeline, LoginService};
use crate::domain::ports::{IdentityStore, ResourceRepository};

/// Dependency bundle for HTTP handlers and the access middleware.
#[derive(Clone)]
pub struct HttpState {
    pub pipeline: AccessPipeline,
    pub login: LoginService,
    pub registration: RegistrationService,
    pub identities: Arc<dyn IdentityStore>,
    pub resources: Arc<dyn ResourceRepository>,
}

impl HttpState {
    pub fn new(
        pipeline: AccessPipeline,
        login: LoginService,
        registration: RegistrationService,
        identities: Arc<dyn IdentityStore>,
        resources: Arc<dyn ResourceRepository>,
    ) -> Self {
        Self {
            pipeline,
            login,
            registration,
            identities,
            resources,
        }
    }
}
