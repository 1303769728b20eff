//! Exchange an email and password for a signed credential.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::ports::{CredentialIssuer, IdentityStore, PasswordHasher};
use crate::domain::{Credential, Error, LoginCredentials};

/// Message shared by unknown-email and wrong-password outcomes.
pub const INVALID_LOGIN: &str = "invalid email/password";

/// Login orchestration over the identity, hashing, and issuing ports.
#[derive(Clone)]
pub struct LoginService {
    identities: Arc<dyn IdentityStore>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn CredentialIssuer>,
}

impl LoginService {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn CredentialIssuer>,
    ) -> Self {
        Self {
            identities,
            hasher,
            issuer,
        }
    }

    /// Verify `credentials` and issue a credential for the matching account.
    ///
    /// A missing account is re-mapped from `NotFound` to `BadRequest` with the
    /// same message as a password mismatch. Other lookup failures propagate.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Credential, Error> {
        let account = self
            .identities
            .fetch_by_email(credentials.email())
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    debug!("login for unknown email");
                    Error::bad_request(INVALID_LOGIN)
                } else {
                    error
                }
            })?;

        if !self
            .hasher
            .compare(account.password_hash(), credentials.password())
        {
            debug!(account = %account.id(), "login password mismatch");
            return Err(Error::bad_request(INVALID_LOGIN));
        }

        let credential = self.issuer.issue(&account).await?;
        info!(account = %account.id(), role = %account.role(), "credential issued");
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCredentialIssuer, MockIdentityStore, MockPasswordHasher};
    use crate::domain::{Account, AccountId, Email, ErrorKind, PasswordHash, Role};
    use rstest::{fixture, rstest};

    #[fixture]
    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", "hunter2").expect("valid credentials")
    }

    fn account() -> Account {
        Account::new(
            AccountId::new(7).expect("valid id"),
            Email::new("ada@example.com").expect("valid email"),
            "ada",
            Role::Admin,
            PasswordHash::new("stored"),
        )
    }

    fn identities(result: Result<Account, Error>) -> MockIdentityStore {
        let mut identities = MockIdentityStore::new();
        identities
            .expect_fetch_by_email()
            .times(1)
            .returning(move |_| result.clone());
        identities
    }

    fn hasher(matches: bool) -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_compare().returning(move |_, _| matches);
        hasher
    }

    fn issuer() -> MockCredentialIssuer {
        let mut issuer = MockCredentialIssuer::new();
        issuer
            .expect_issue()
            .returning(|account| Ok(Credential::new(format!("token-{}", account.id()))));
        issuer
    }

    fn service(
        identities: MockIdentityStore,
        hasher: MockPasswordHasher,
        issuer: MockCredentialIssuer,
    ) -> LoginService {
        LoginService::new(Arc::new(identities), Arc::new(hasher), Arc::new(issuer))
    }

    #[rstest]
    #[tokio::test]
    async fn matching_password_issues_credential(credentials: LoginCredentials) {
        let credential = service(identities(Ok(account())), hasher(true), issuer())
            .login(&credentials)
            .await
            .expect("login succeeds");
        assert_eq!(credential.as_str(), "token-7");
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_never_issues(credentials: LoginCredentials) {
        let mut issuer = MockCredentialIssuer::new();
        issuer.expect_issue().never();

        let err = service(identities(Ok(account())), hasher(false), issuer)
            .login(&credentials)
            .await
            .expect_err("password mismatch");
        assert_eq!(err, Error::bad_request(INVALID_LOGIN));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_email_is_indistinguishable_from_wrong_password(
        credentials: LoginCredentials,
    ) {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_compare().never();

        let err = service(
            identities(Err(Error::not_found("user not found"))),
            hasher,
            issuer(),
        )
        .login(&credentials)
        .await
        .expect_err("unknown email");
        assert_eq!(err, Error::bad_request(INVALID_LOGIN));
    }

    #[rstest]
    #[tokio::test]
    async fn storage_failures_keep_their_kind(credentials: LoginCredentials) {
        let err = service(
            identities(Err(Error::opaque_internal())),
            hasher(true),
            issuer(),
        )
        .login(&credentials)
        .await
        .expect_err("storage failure");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
