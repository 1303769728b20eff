//! Ownership and role checks run after authentication.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ports::ResourceLocator;
use crate::domain::{CallerIdentity, Error, ResourceId, ResourceKind, Role};

/// Message returned when a role-gated route rejects the caller.
pub const ROLE_REQUIRED_MESSAGE: &str = "You're not authorized to access this endpoint";

/// Ownership check for one resource kind.
///
/// All kinds share this algorithm; only the [`ResourceKind`] and therefore
/// the locator query and messages differ.
#[derive(Clone)]
pub struct OwnershipGuard {
    kind: ResourceKind,
    locator: Arc<dyn ResourceLocator>,
}

impl OwnershipGuard {
    pub fn new(kind: ResourceKind, locator: Arc<dyn ResourceLocator>) -> Self {
        Self { kind, locator }
    }

    /// Admit `caller` only if they own resource `resource_id`.
    ///
    /// A missing resource is reported as `BadRequest` rather than `NotFound`:
    /// the id came from the caller, so a miss is a caller input error. Other
    /// locator failures propagate unchanged. An ownership mismatch always
    /// halts the request.
    pub async fn authorize(
        &self,
        caller: CallerIdentity,
        resource_id: ResourceId,
    ) -> Result<(), Error> {
        let ownership = self
            .locator
            .fetch_owner(self.kind, resource_id)
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    debug!(kind = %self.kind, %resource_id, "guarded resource missing");
                    Error::bad_request(self.kind.not_found_message())
                } else {
                    error
                }
            })?;

        if !ownership.is_owned_by(caller.id()) {
            info!(
                kind = %self.kind,
                %resource_id,
                caller = %caller.id(),
                owner = %ownership.owner_id(),
                "ownership check rejected caller"
            );
            return Err(Error::unauthorized(self.kind.not_owner_message()));
        }

        Ok(())
    }
}

/// Admit `caller` only if their credential carries `required`.
///
/// Callers without any role claim are rejected the same way as callers with
/// a different role.
///
/// # Examples
/// ```
/// use access_pipeline::domain::auth::require_role;
/// use access_pipeline::domain::{AccountId, CallerIdentity, ErrorKind, Role};
///
/// let member = CallerIdentity::new(AccountId::new(7).unwrap(), Some(Role::Member));
/// let err = require_role(member, Role::Admin).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Unauthorized);
/// ```
pub fn require_role(caller: CallerIdentity, required: Role) -> Result<(), Error> {
    if caller.role() == Some(required) {
        return Ok(());
    }
    info!(
        caller = %caller.id(),
        required = %required,
        "role check rejected caller"
    );
    Err(Error::unauthorized(ROLE_REQUIRED_MESSAGE))
}
