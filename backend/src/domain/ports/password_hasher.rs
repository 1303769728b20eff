//! Driven port for password hashing.

use crate::domain::{Error, PasswordHash};

/// Opaque password hashing capability.
///
/// Hashing is CPU-bound and synchronous; adapters must not block on I/O.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce an encoded hash for `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, Error>;

    /// Check `password` against a previously produced hash.
    fn compare(&self, hash: &PasswordHash, password: &str) -> bool;
}
