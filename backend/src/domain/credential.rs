//! Signed credentials and the claims they carry.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{AccountId, CallerIdentity, Role};

/// Opaque signed token handed to a caller at login.
///
/// Immutable once issued; expiry is decided by comparing `expires_at` with
/// the current time, there is no revocation list.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Claims extracted from a credential after its signature has been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialClaims {
    subject: AccountId,
    role: Option<Role>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CredentialClaims {
    pub fn new(
        subject: AccountId,
        role: Option<Role>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            role,
            issued_at,
            expires_at,
        }
    }

    pub fn subject(&self) -> AccountId {
        self.subject
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A credential is expired once `now` reaches `expires_at`.
    ///
    /// # Examples
    /// ```
    /// use access_pipeline::domain::{AccountId, CredentialClaims};
    /// use chrono::{Duration, TimeZone, Utc};
    ///
    /// let issued = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let claims = CredentialClaims::new(
    ///     AccountId::new(7).unwrap(),
    ///     None,
    ///     issued,
    ///     issued + Duration::hours(1),
    /// );
    /// assert!(!claims.is_expired_at(issued));
    /// assert!(claims.is_expired_at(issued + Duration::hours(1)));
    /// ```
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Caller identity asserted by these claims.
    pub fn caller(&self) -> CallerIdentity {
        CallerIdentity::new(self.subject, self.role)
    }
}
