//! Signed credential adapter.
//!
//! Implements the [`crate::domain::ports::CredentialIssuer`] and
//! [`crate::domain::ports::CredentialVerifier`] ports with a compact
//! HMAC-SHA256 token. Key material is loaded by the HTTP configuration layer
//! and handed over as a [`SigningKey`].

mod hmac_token;
mod signing_key;

pub use hmac_token::{DEFAULT_LIFETIME_MINUTES, HmacCredentialCodec, MAX_LIFETIME_MINUTES};
pub use signing_key::{SIGNING_KEY_MIN_LEN, SigningKey};
