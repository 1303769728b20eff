//! Driven ports for issuing and verifying signed credentials.

use async_trait::async_trait;

use crate::domain::{Account, Credential, CredentialClaims, Error};

/// Structural and cryptographic verification of a raw credential.
///
/// Any failure (bad encoding, bad signature, expiry) is reported as
/// [`crate::domain::ErrorKind::Unauthenticated`] with the message
/// `"invalid token"`; callers cannot tell the reasons apart.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, raw: &str) -> Result<CredentialClaims, Error>;
}

/// Issues a credential for an account at login.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn issue(&self, account: &Account) -> Result<Credential, Error>;
}
