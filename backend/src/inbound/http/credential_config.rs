//! Credential signing settings read from the environment.
//!
//! ```text
//! CREDENTIAL_KEY_FILE        signing key file (default /var/run/secrets/credential_key)
//! CREDENTIAL_TTL_MINUTES     credential lifetime in minutes (default 1440)
//! CREDENTIAL_ALLOW_EPHEMERAL 1|0; debug builds only
//! ```

use std::path::PathBuf;

use chrono::Duration;
use mockable::Env;
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::outbound::credential::{
    DEFAULT_LIFETIME_MINUTES, MAX_LIFETIME_MINUTES, SIGNING_KEY_MIN_LEN, SigningKey,
};

const KEY_DEFAULT_PATH: &str = "/var/run/secrets/credential_key";
const KEY_FILE_ENV: &str = "CREDENTIAL_KEY_FILE";
const TTL_ENV: &str = "CREDENTIAL_TTL_MINUTES";
const ALLOW_EPHEMERAL_ENV: &str = "CREDENTIAL_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a positive number of minutes, at most 525600 (one year)";

/// Build mode the settings are validated for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates missing keys and bad toggles, warning instead.
    Debug,
    /// Every toggle must be valid and the key file must exist.
    Release,
}

impl BuildMode {
    /// Derive the mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use access_pipeline::inbound::http::credential_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Signing key and lifetime for issued credentials.
#[derive(Debug)]
pub struct CredentialSettings {
    pub key: SigningKey,
    pub lifetime: Duration,
}

/// Errors raised while validating credential configuration.
#[derive(thiserror::Error, Debug)]
pub enum CredentialConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read credential key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("credential key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("CREDENTIAL_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read credential settings from `env`, validated for `mode`.
///
/// # Errors
///
/// Release builds reject invalid toggles, unreadable or short key files and
/// ephemeral keys. Debug builds only fail when ephemeral keys are explicitly
/// disabled and the key file cannot be read.
///
/// # Examples
///
/// ```rust
/// use access_pipeline::inbound::http::credential_config::{
///     BuildMode, credential_settings_from_env,
/// };
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("credential_key_example");
/// std::fs::write(&key_path, vec![b'k'; 32])?;
///
/// let key_path = key_path.to_string_lossy().into_owned();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "CREDENTIAL_KEY_FILE" => Some(key_path.clone()),
///     "CREDENTIAL_TTL_MINUTES" => Some("30".to_owned()),
///     _ => None,
/// });
///
/// let settings = credential_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.lifetime.num_minutes(), 30);
/// # Ok(())
/// # }
/// ```
pub fn credential_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<CredentialSettings, CredentialConfigError> {
    let lifetime = lifetime_from_env(env, mode)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let key = key_from_env(env, mode, allow_ephemeral)?;
    info!(
        fingerprint = %key.fingerprint(),
        lifetime_minutes = lifetime.num_minutes(),
        "credential settings loaded"
    );
    Ok(CredentialSettings { key, lifetime })
}

fn lifetime_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Duration, CredentialConfigError> {
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(default_lifetime());
    };
    let parsed = value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|minutes| (1..=MAX_LIFETIME_MINUTES).contains(minutes))
        .and_then(Duration::try_minutes);
    match parsed {
        Some(lifetime) => Ok(lifetime),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid CREDENTIAL_TTL_MINUTES; using default");
            Ok(default_lifetime())
        }
        None => Err(CredentialConfigError::InvalidEnv {
            name: TTL_ENV,
            value,
            expected: TTL_EXPECTED,
        }),
    }
}

fn default_lifetime() -> Duration {
    Duration::minutes(DEFAULT_LIFETIME_MINUTES)
}

/// `None` when the toggle is unset.
fn allow_ephemeral_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Option<bool>, CredentialConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(None);
    };
    match (parse_bool(&value), mode) {
        (Some(true), BuildMode::Release) => Err(CredentialConfigError::EphemeralNotAllowed),
        (Some(flag), _) => Ok(Some(flag)),
        (None, BuildMode::Debug) => {
            warn!(value = %value, "invalid CREDENTIAL_ALLOW_EPHEMERAL; ignoring");
            Ok(None)
        }
        (None, BuildMode::Release) => Err(CredentialConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: Option<bool>,
) -> Result<SigningKey, CredentialConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = if mode.is_debug() { 1 } else { SIGNING_KEY_MIN_LEN };
            if length < min_len {
                bytes.zeroize();
                return Err(CredentialConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            Ok(SigningKey::from_bytes(bytes))
        }
        Err(source) if mode.is_debug() && allow_ephemeral != Some(false) => {
            warn!(
                path = %path.display(),
                error = %source,
                "using ephemeral credential key (dev only)"
            );
            Ok(SigningKey::generate())
        }
        Err(source) => Err(CredentialConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
