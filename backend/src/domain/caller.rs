//! Request-scoped caller identity.

use serde::Serialize;
use utoipa::ToSchema;

use super::{AccountId, Role};

/// Authenticated caller reconstructed from a verified credential.
///
/// Lives for one request only: the authentication stage returns it by value
/// and every later stage or handler receives it as an explicit argument.
/// The role comes from the verified credential claims, never from a fresh
/// account read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CallerIdentity {
    #[schema(value_type = i64, example = 7)]
    id: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

impl CallerIdentity {
    pub fn new(id: AccountId, role: Option<Role>) -> Self {
        Self { id, role }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Role asserted by the credential, absent for services without roles.
    pub fn role(&self) -> Option<Role> {
        self.role
    }
}
