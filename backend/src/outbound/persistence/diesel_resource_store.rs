//! PostgreSQL-backed `ResourceLocator` and `ResourceRepository`.
//!
//! Every guarded table exposes `id` and `user_id`; the per-kind queries are
//! generated by the macros below so the ownership algorithm stays in the
//! domain. Updates never touch `user_id`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use super::error::StorageError;
use super::models::OwnershipRow;
use super::pool::DbPool;
use super::schema::{categories, comments, photos, products, social_medias, tasks};
use crate::domain::ports::{ResourceLocator, ResourceRepository};
use crate::domain::{
    AccountId, Error, ResourceId, ResourceKind, ResourceOwnership, ResourceUpdate,
};

macro_rules! owner_of {
    ($table:ident, $id:expr, $conn:expr) => {
        $table::table
            .filter($table::id.eq($id))
            .select(($table::id, $table::user_id))
            .first::<OwnershipRow>($conn)
            .await
    };
}

macro_rules! delete_from {
    ($table:ident, $id:expr, $conn:expr) => {
        diesel::delete($table::table.filter($table::id.eq($id)))
            .execute($conn)
            .await
    };
}

macro_rules! update_set {
    ($table:ident, $id:expr, $conn:expr, $changes:expr) => {
        diesel::update($table::table.filter($table::id.eq($id)))
            .set($changes)
            .execute($conn)
            .await
    };
}

/// Ownership lookups, updates and deletes across all guarded resource tables.
#[derive(Clone)]
pub struct DieselResourceStore {
    pool: DbPool,
}

impl DieselResourceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn entity(kind: ResourceKind) -> &'static str {
    kind.label()
}

#[async_trait]
impl ResourceLocator for DieselResourceStore {
    async fn fetch_owner(
        &self,
        kind: ResourceKind,
        id: ResourceId,
    ) -> Result<ResourceOwnership, Error> {
        let mut conn = self.pool.get().await.map_err(StorageError::from)?;
        let raw = id.get();
        let row = match kind {
            ResourceKind::Photo => owner_of!(photos, raw, &mut conn),
            ResourceKind::Comment => owner_of!(comments, raw, &mut conn),
            ResourceKind::SocialMedia => owner_of!(social_medias, raw, &mut conn),
            ResourceKind::Task => owner_of!(tasks, raw, &mut conn),
            ResourceKind::Category => owner_of!(categories, raw, &mut conn),
            ResourceKind::Product => owner_of!(products, raw, &mut conn),
        }
        .map_err(|err| StorageError::from_diesel(entity(kind), err))?;

        let owner = AccountId::new(row.user_id).map_err(|err| {
            StorageError::query(format!("{kind} {} has invalid owner: {err}", row.id))
        })?;
        Ok(ResourceOwnership::new(ResourceId::new(row.id), owner))
    }
}

#[async_trait]
impl ResourceRepository for DieselResourceStore {
    async fn delete(&self, kind: ResourceKind, id: ResourceId) -> Result<(), Error> {
        let mut conn = self.pool.get().await.map_err(StorageError::from)?;
        let raw = id.get();
        let deleted = match kind {
            ResourceKind::Photo => delete_from!(photos, raw, &mut conn),
            ResourceKind::Comment => delete_from!(comments, raw, &mut conn),
            ResourceKind::SocialMedia => delete_from!(social_medias, raw, &mut conn),
            ResourceKind::Task => delete_from!(tasks, raw, &mut conn),
            ResourceKind::Category => delete_from!(categories, raw, &mut conn),
            ResourceKind::Product => delete_from!(products, raw, &mut conn),
        }
        .map_err(|err| StorageError::from_diesel(entity(kind), err))?;

        if deleted == 0 {
            return Err(StorageError::not_found(entity(kind)).into());
        }
        debug!(%kind, %id, "resource deleted");
        Ok(())
    }

    async fn update(&self, id: ResourceId, update: &ResourceUpdate) -> Result<(), Error> {
        let mut conn = self.pool.get().await.map_err(StorageError::from)?;
        let kind = update.kind();
        let raw = id.get();
        let updated = match update {
            ResourceUpdate::Photo {
                title,
                caption,
                photo_url,
            } => update_set!(
                photos,
                raw,
                &mut conn,
                (
                    photos::title.eq(title),
                    photos::caption.eq(caption),
                    photos::photo_url.eq(photo_url),
                )
            ),
            ResourceUpdate::Comment { message } => {
                update_set!(comments, raw, &mut conn, comments::message.eq(message))
            }
            ResourceUpdate::SocialMedia {
                name,
                social_media_url,
            } => update_set!(
                social_medias,
                raw,
                &mut conn,
                (
                    social_medias::name.eq(name),
                    social_medias::social_media_url.eq(social_media_url),
                )
            ),
            ResourceUpdate::Task { title, description } => update_set!(
                tasks,
                raw,
                &mut conn,
                (tasks::title.eq(title), tasks::description.eq(description))
            ),
            ResourceUpdate::TaskStatus { status } => {
                update_set!(tasks, raw, &mut conn, tasks::status.eq(*status))
            }
            ResourceUpdate::Category { category_type } => update_set!(
                categories,
                raw,
                &mut conn,
                categories::category_type.eq(category_type)
            ),
            ResourceUpdate::Product { title, price } => update_set!(
                products,
                raw,
                &mut conn,
                (products::title.eq(title), products::price.eq(*price))
            ),
        }
        .map_err(|err| StorageError::from_diesel(entity(kind), err))?;

        if updated == 0 {
            return Err(StorageError::not_found(entity(kind)).into());
        }
        debug!(%kind, %id, "resource updated");
        Ok(())
    }
}
