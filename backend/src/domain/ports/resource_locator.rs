//! Driven port resolving the owner of a resource instance.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::error;

use crate::domain::{Error, ResourceId, ResourceKind, ResourceOwnership, ResourceUpdate};

use super::ResourceRepository;

/// One polymorphic lookup shared by every guarded resource kind.
///
/// Implementations return [`crate::domain::ErrorKind::NotFound`] when the
/// resource does not exist and [`crate::domain::ErrorKind::Internal`] for
/// storage failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceLocator: Send + Sync {
    /// Return the owning account of resource `id` of kind `kind`.
    async fn fetch_owner(
        &self,
        kind: ResourceKind,
        id: ResourceId,
    ) -> Result<ResourceOwnership, Error>;
}

/// In-memory resource ownership table used when no database is configured.
///
/// Implements both [`ResourceLocator`] and [`ResourceRepository`] so deletes
/// and updates performed through the HTTP surface are visible to later
/// lookups. Field values are kept as a JSON object per row.
#[derive(Debug, Default)]
pub struct FixtureResourceStore {
    rows: RwLock<HashMap<(ResourceKind, ResourceId), FixtureRow>>,
}

#[derive(Debug, Clone)]
struct FixtureRow {
    ownership: ResourceOwnership,
    fields: Map<String, Value>,
}

impl FixtureResourceStore {
    pub fn new(entries: impl IntoIterator<Item = (ResourceKind, ResourceOwnership)>) -> Self {
        let rows = entries
            .into_iter()
            .map(|(kind, ownership)| {
                let row = FixtureRow {
                    ownership,
                    fields: Map::new(),
                };
                ((kind, ownership.resource_id()), row)
            })
            .collect();
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Current field values of a row, `None` when it does not exist.
    pub fn fields(
        &self,
        kind: ResourceKind,
        id: ResourceId,
    ) -> Result<Option<Map<String, Value>>, Error> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(&(kind, id)).map(|row| row.fields.clone()))
    }
}

fn poisoned() -> Error {
    error!("fixture resource store lock poisoned");
    Error::opaque_internal()
}

#[async_trait]
impl ResourceLocator for FixtureResourceStore {
    async fn fetch_owner(
        &self,
        kind: ResourceKind,
        id: ResourceId,
    ) -> Result<ResourceOwnership, Error> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        rows.get(&(kind, id))
            .map(|row| row.ownership)
            .ok_or_else(|| Error::not_found(kind.not_found_message()))
    }
}

#[async_trait]
impl ResourceRepository for FixtureResourceStore {
    async fn delete(&self, kind: ResourceKind, id: ResourceId) -> Result<(), Error> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        rows.remove(&(kind, id))
            .map(|_| ())
            .ok_or_else(|| Error::not_found(kind.not_found_message()))
    }

    async fn update(&self, id: ResourceId, update: &ResourceUpdate) -> Result<(), Error> {
        let kind = update.kind();
        let Value::Object(changes) = serde_json::to_value(update).map_err(|err| {
            error!(%err, "resource update not serialisable");
            Error::opaque_internal()
        })?
        else {
            error!(%kind, "resource update did not serialise to an object");
            return Err(Error::opaque_internal());
        };

        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        let row = rows
            .get_mut(&(kind, id))
            .ok_or_else(|| Error::not_found(kind.not_found_message()))?;
        row.fields.extend(changes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, ErrorKind};
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> FixtureResourceStore {
        let owner = AccountId::new(9).expect("valid id");
        FixtureResourceStore::new([(
            ResourceKind::Photo,
            ResourceOwnership::new(ResourceId::new(42), owner),
        )])
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_are_scoped_by_kind(store: FixtureResourceStore) {
        let photo = store
            .fetch_owner(ResourceKind::Photo, ResourceId::new(42))
            .await
            .expect("photo exists");
        assert_eq!(photo.owner_id().get(), 9);

        let err = store
            .fetch_owner(ResourceKind::Comment, ResourceId::new(42))
            .await
            .expect_err("no comment 42");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "comment not found");
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_resources_stop_resolving(store: FixtureResourceStore) {
        store
            .delete(ResourceKind::Photo, ResourceId::new(42))
            .await
            .expect("delete succeeds");
        let err = store
            .fetch_owner(ResourceKind::Photo, ResourceId::new(42))
            .await
            .expect_err("photo removed");
        assert!(err.is_not_found());
    }

    #[rstest]
    #[tokio::test]
    async fn updates_merge_fields_and_keep_the_owner(store: FixtureResourceStore) {
        let id = ResourceId::new(42);
        store
            .update(id, &ResourceUpdate::photo("dawn", "", "https://img/42").expect("valid"))
            .await
            .expect("update succeeds");

        let fields = store
            .fields(ResourceKind::Photo, id)
            .expect("lock")
            .expect("row exists");
        assert_eq!(fields.get("title"), Some(&Value::from("dawn")));
        let owner = store
            .fetch_owner(ResourceKind::Photo, id)
            .await
            .expect("photo exists");
        assert_eq!(owner.owner_id().get(), 9);
    }

    #[rstest]
    #[tokio::test]
    async fn updating_a_missing_row_is_not_found(store: FixtureResourceStore) {
        let err = store
            .update(ResourceId::new(42), &ResourceUpdate::task_status(true))
            .await
            .expect_err("no task 42");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "task not found");
    }
}
