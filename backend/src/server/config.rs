//! HTTP server configuration object.

use std::net::SocketAddr;

use access_pipeline::inbound::http::credential_config::CredentialSettings;
use access_pipeline::outbound::password::{DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB};
use access_pipeline::outbound::persistence::DbPool;

/// Everything the server needs beyond the process environment.
pub struct ServerConfig {
    pub(crate) credential: CredentialSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) password_memory_kib: u32,
    pub(crate) password_iterations: u32,
}

impl ServerConfig {
    #[must_use]
    pub fn new(credential: CredentialSettings, bind_addr: SocketAddr) -> Self {
        Self {
            credential,
            bind_addr,
            db_pool: None,
            password_memory_kib: DEFAULT_MEMORY_KIB,
            password_iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Use the Diesel adapters instead of the in-memory fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Argon2id memory cost for newly hashed passwords.
    #[must_use]
    pub fn with_password_memory_kib(mut self, memory_kib: u32) -> Self {
        self.password_memory_kib = memory_kib;
        self
    }

    /// Argon2id iteration count for newly hashed passwords.
    #[must_use]
    pub fn with_password_iterations(mut self, iterations: u32) -> Self {
        self.password_iterations = iterations;
        self
    }
}
