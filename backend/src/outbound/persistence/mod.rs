//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! and table definitions stay private to this module; failures are
//! classified as [`StorageError`] and converted into domain errors at the
//! port boundary.
//!
//! # Example
//!
//! ```ignore
//! use access_pipeline::outbound::persistence::{DbPool, DieselIdentityStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/access")).await?;
//! let identities = DieselIdentityStore::new(pool);
//! ```

mod diesel_identity_store;
mod diesel_resource_store;
mod error;
mod models;
mod pool;
mod schema;

pub use diesel_identity_store::DieselIdentityStore;
pub use diesel_resource_store::DieselResourceStore;
pub use error::StorageError;
pub use pool::{DbPool, PoolConfig, PoolError};
