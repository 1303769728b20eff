//! Compact `header.claims.signature` tokens signed with HMAC-SHA256.
//!
//! ```text
//! base64url({"alg":"HS256","typ":"JWT"}) . base64url({"id":7,"role":"admin","iat":..,"exp":..}) . base64url(mac)
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, error};

use super::SigningKey;
use crate::domain::auth::INVALID_TOKEN;
use crate::domain::ports::{CredentialIssuer, CredentialVerifier};
use crate::domain::{Account, AccountId, Credential, CredentialClaims, Error, Role};

type HmacSha256 = Hmac<Sha256>;

/// Credential lifetime used when none is configured (24 hours).
pub const DEFAULT_LIFETIME_MINUTES: i64 = 24 * 60;

/// Longest credential lifetime accepted from configuration (one year).
pub const MAX_LIFETIME_MINUTES: i64 = 365 * 24 * 60;

/// Tolerated clock drift for tokens minted by another instance.
const ISSUED_AT_SKEW_SECS: i64 = 60;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    iat: i64,
    exp: i64,
}

/// Reasons a token fails verification. Logged, never returned to callers.
#[derive(Debug, thiserror::Error)]
enum TokenError {
    #[error("token must have exactly three dot-separated parts")]
    Malformed,
    #[error("token segment is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token segment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported signing algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    #[error("signing key rejected by HMAC")]
    Key,
    #[error("signature mismatch")]
    BadSignature,
    #[error("subject id must be positive, got {0}")]
    InvalidSubject(i64),
    #[error("timestamp {0} out of range")]
    Timestamp(i64),
    #[error("token expired at {0}")]
    Expired(DateTime<Utc>),
    #[error("token issued in the future at {0}")]
    IssuedInFuture(DateTime<Utc>),
    #[error("expiry overflows when adding the lifetime to {0}")]
    ExpiryOverflow(DateTime<Utc>),
}

/// Issues and verifies HMAC-signed credentials.
///
/// The clock is injected so expiry decisions are deterministic under test.
#[derive(Clone)]
pub struct HmacCredentialCodec {
    key: SigningKey,
    lifetime: Duration,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl HmacCredentialCodec {
    pub fn new(key: SigningKey, lifetime: Duration, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            key,
            lifetime,
            clock,
        }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(self.key.as_bytes()).map_err(|_| TokenError::Key)
    }

    fn sign(&self, header: &[u8], claims: &[u8]) -> Result<String, TokenError> {
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(claims)
        );
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    fn encode(&self, account: &Account) -> Result<String, TokenError> {
        let now = self.clock.utc();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or(TokenError::ExpiryOverflow(now))?;
        let header = serde_json::to_vec(&TokenHeader {
            alg: ALGORITHM.to_owned(),
            typ: Some(TOKEN_TYPE.to_owned()),
        })?;
        let claims = serde_json::to_vec(&TokenClaims {
            id: account.id().get(),
            role: Some(account.role()),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })?;
        self.sign(&header, &claims)
    }

    fn decode(&self, raw: &str) -> Result<CredentialClaims, TokenError> {
        let (signing_input, signature) = raw.rsplit_once('.').ok_or(TokenError::Malformed)?;
        let (header, claims) = signing_input
            .split_once('.')
            .ok_or(TokenError::Malformed)?;
        if claims.contains('.') {
            return Err(TokenError::Malformed);
        }

        let header: TokenHeader = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header)?)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm(header.alg));
        }

        let signature = URL_SAFE_NO_PAD.decode(signature)?;
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: TokenClaims = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(claims)?)?;
        let subject = AccountId::new(claims.id).map_err(|_| TokenError::InvalidSubject(claims.id))?;
        let issued_at = timestamp(claims.iat)?;
        let expires_at = timestamp(claims.exp)?;
        let verified = CredentialClaims::new(subject, claims.role, issued_at, expires_at);

        let now = self.clock.utc();
        if issued_at.timestamp() > now.timestamp().saturating_add(ISSUED_AT_SKEW_SECS) {
            return Err(TokenError::IssuedInFuture(issued_at));
        }
        if verified.is_expired_at(now) {
            return Err(TokenError::Expired(expires_at));
        }
        Ok(verified)
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(secs, 0).ok_or(TokenError::Timestamp(secs))
}

#[async_trait]
impl CredentialVerifier for HmacCredentialCodec {
    async fn verify(&self, raw: &str) -> Result<CredentialClaims, Error> {
        self.decode(raw).map_err(|reason| {
            debug!(%reason, "credential verification failed");
            Error::unauthenticated(INVALID_TOKEN)
        })
    }
}

#[async_trait]
impl CredentialIssuer for HmacCredentialCodec {
    async fn issue(&self, account: &Account) -> Result<Credential, Error> {
        self.encode(account).map(Credential::new).map_err(|reason| {
            error!(%reason, account = %account.id(), "credential encoding failed");
            Error::opaque_internal()
        })
    }
}
