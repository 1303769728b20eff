//! Driven port for resource mutations admitted by the access pipeline.

use async_trait::async_trait;

use crate::domain::{Error, ResourceId, ResourceKind, ResourceUpdate};

/// Mutations on guarded resources.
///
/// Each call is all-or-nothing and touches exactly one resource row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Remove resource `id` of kind `kind`.
    async fn delete(&self, kind: ResourceKind, id: ResourceId) -> Result<(), Error>;

    /// Apply `update` to resource `id` of kind `update.kind()`.
    ///
    /// Ownership is never changed by an update.
    async fn update(&self, id: ResourceId, update: &ResourceUpdate) -> Result<(), Error>;
}
