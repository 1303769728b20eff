//! Process settings loaded via OrthoConfig.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use access_pipeline::outbound::persistence::PoolConfig;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;

/// Bind address, database and hashing settings (`ACCESS_*`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCESS")]
pub struct AppSettings {
    /// Interface to bind; all interfaces when unset.
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    /// PostgreSQL URL. In-memory fixtures are served when unset.
    pub database_url: Option<String>,
    pub pool_max_size: Option<u32>,
    pub pool_timeout_secs: Option<u64>,
    /// Argon2id memory cost in KiB for new password hashes.
    pub password_memory_kib: Option<u32>,
    /// Argon2id iteration count for new password hashes.
    pub password_iterations: Option<u32>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Pool configuration when a database URL is present.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let timeout = Duration::from_secs(
            self.pool_timeout_secs.unwrap_or(DEFAULT_POOL_TIMEOUT_SECS),
        );
        let config = PoolConfig::new(url).with_connection_timeout(timeout);
        Some(match self.pool_max_size {
            Some(size) => config.with_max_size(size),
            None => config,
        })
    }
}
