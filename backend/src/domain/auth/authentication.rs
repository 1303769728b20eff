//! First stage of every protected request.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{CredentialVerifier, IdentityStore};
use crate::domain::{CallerIdentity, Error};

/// Message shared by every authentication failure.
pub const INVALID_TOKEN: &str = "invalid token";

pub(super) fn invalid_token() -> Error {
    Error::unauthenticated(INVALID_TOKEN)
}

/// Verifies a raw credential and resolves it to a live caller.
///
/// "No such account" and "account lookup failed" collapse into the same
/// `Unauthenticated` outcome so callers cannot enumerate accounts.
/// The stage only reads, so calling it twice with the same credential inside
/// its validity window yields the same identity.
#[derive(Clone)]
pub struct AuthenticationStage {
    verifier: Arc<dyn CredentialVerifier>,
    identities: Arc<dyn IdentityStore>,
}

impl AuthenticationStage {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            verifier,
            identities,
        }
    }

    /// Verify `raw_credential` and confirm its subject still exists.
    ///
    /// The returned role comes from the verified claims, not from the account
    /// record read here.
    pub async fn authenticate(&self, raw_credential: &str) -> Result<CallerIdentity, Error> {
        let claims = self.verifier.verify(raw_credential).await.map_err(|error| {
            debug!(kind = %error.kind(), reason = %error, "credential rejected");
            invalid_token()
        })?;

        if let Err(error) = self.identities.fetch_by_id(claims.subject()).await {
            debug!(
                subject = %claims.subject(),
                kind = %error.kind(),
                "credential subject could not be loaded"
            );
            return Err(invalid_token());
        }

        Ok(claims.caller())
    }
}

#[cfg(test)]
mod tests {
    //! Behaviour of the authentication stage against mocked collaborators.
    use super::*;
    use crate::domain::ports::{MockCredentialVerifier, MockIdentityStore};
    use crate::domain::{
        Account, AccountId, CredentialClaims, Email, ErrorKind, PasswordHash, Role,
    };
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    fn claims(subject: i64, role: Option<Role>) -> CredentialClaims {
        let issued = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        CredentialClaims::new(
            AccountId::new(subject).expect("valid id"),
            role,
            issued,
            issued + Duration::hours(1),
        )
    }

    fn account(id: AccountId, role: Role) -> Account {
        Account::new(
            id,
            Email::new("ada@example.com").expect("valid email"),
            "ada",
            role,
            PasswordHash::new("hash"),
        )
    }

    fn stage(verifier: MockCredentialVerifier, identities: MockIdentityStore) -> AuthenticationStage {
        AuthenticationStage::new(Arc::new(verifier), Arc::new(identities))
    }

    #[rstest]
    #[tokio::test]
    async fn verified_credential_for_existing_account_yields_caller() {
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify()
            .times(2)
            .returning(|_| Ok(claims(7, Some(Role::Admin))));
        let mut identities = MockIdentityStore::new();
        // The stored role differs from the claim; the claim wins.
        identities
            .expect_fetch_by_id()
            .times(2)
            .returning(|id| Ok(account(id, Role::Member)));
        let stage = stage(verifier, identities);

        let first = stage.authenticate("good").await.expect("authenticated");
        let second = stage.authenticate("good").await.expect("authenticated");

        assert_eq!(first, second);
        assert_eq!(first.id().get(), 7);
        assert_eq!(first.role(), Some(Role::Admin));
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_credential_never_reaches_the_identity_store() {
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(Error::unauthenticated("signature mismatch")));
        let mut identities = MockIdentityStore::new();
        identities.expect_fetch_by_id().never();

        let err = stage(verifier, identities)
            .authenticate("forged")
            .await
            .expect_err("forged credential");

        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[rstest]
    #[case(Error::not_found("user not found"))]
    #[case(Error::opaque_internal())]
    #[tokio::test]
    async fn identity_lookup_failures_are_indistinguishable_from_bad_tokens(
        #[case] lookup_error: Error,
    ) {
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify().returning(|_| Ok(claims(7, None)));
        let mut identities = MockIdentityStore::new();
        identities
            .expect_fetch_by_id()
            .returning(move |_| Err(lookup_error.clone()));

        let err = stage(verifier, identities)
            .authenticate("orphaned")
            .await
            .expect_err("subject cannot be loaded");

        assert_eq!(err, invalid_token());
    }
}
