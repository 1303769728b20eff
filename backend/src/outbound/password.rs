//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
//! so verification always uses the cost recorded in the stored hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use tracing::{debug, error};

use crate::domain::ports::PasswordHasher;
use crate::domain::{Error, PasswordHash};

/// Memory cost used when none is configured.
pub const DEFAULT_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;

/// Iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: u32 = Params::DEFAULT_T_COST;

/// Rejected Argon2 cost parameters.
#[derive(Debug, thiserror::Error)]
#[error("invalid password hashing cost (memory {memory_kib} KiB, {iterations} iterations): {source}")]
pub struct PasswordCostError {
    memory_kib: u32,
    iterations: u32,
    source: argon2::Error,
}

/// [`PasswordHasher`] backed by `argon2`.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Build a hasher with explicit Argon2id costs and a single lane.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordCostError`] when argon2 rejects the parameters, for
    /// example a memory cost under 8 KiB or zero iterations.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, PasswordCostError> {
        let params = Params::new(memory_kib, iterations, 1, None).map_err(|source| {
            PasswordCostError {
                memory_kib,
                iterations,
                source,
            }
        })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, Error> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| PasswordHash::new(phc.to_string()))
            .map_err(|reason| {
                error!(%reason, "password hashing failed");
                Error::opaque_internal()
            })
    }

    fn compare(&self, hash: &PasswordHash, password: &str) -> bool {
        let Ok(stored) = PhcString::new(hash.as_ref()) else {
            debug!("stored password hash is not a PHC string");
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &stored)
            .is_ok()
    }
}
