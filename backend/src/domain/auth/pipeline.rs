//! Ordered per-route stage lists and the executor that runs them.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::authentication::invalid_token;
use super::{AuthenticationStage, OwnershipGuard, require_role};
use crate::domain::ports::ResourceLocator;
use crate::domain::{CallerIdentity, Error, ResourceId, ResourceKind, Role};

/// One sequential step of the access pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticate,
    Authorize(ResourceKind),
    RequireRole(Role),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticate => f.write_str("authenticate"),
            Self::Authorize(kind) => write!(f, "authorize({kind})"),
            Self::RequireRole(role) => write!(f, "require_role({role})"),
        }
    }
}

/// A check that runs after authentication has produced a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCheck {
    Owner(ResourceKind),
    Role(Role),
}

impl From<RouteCheck> for Stage {
    fn from(check: RouteCheck) -> Self {
        match check {
            RouteCheck::Owner(kind) => Self::Authorize(kind),
            RouteCheck::Role(role) => Self::RequireRole(role),
        }
    }
}

/// Rejections raised when building a [`RoutePolicy`] from a raw stage list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutePolicyError {
    #[error("stage list must not be empty")]
    Empty,
    #[error("stage list must begin with authenticate, found {0}")]
    MissingAuthentication(Stage),
    #[error("authenticate may only appear once, at the start")]
    RepeatedAuthentication,
}

/// Stage list attached to a protected route.
///
/// Authentication is always the first stage; the remaining checks run in
/// insertion order.
///
/// # Examples
/// ```
/// use access_pipeline::domain::auth::{RoutePolicy, Stage};
/// use access_pipeline::domain::ResourceKind;
///
/// let policy = RoutePolicy::owner_of(ResourceKind::Photo);
/// let stages: Vec<Stage> = policy.stages().collect();
/// assert_eq!(
///     stages,
///     vec![Stage::Authenticate, Stage::Authorize(ResourceKind::Photo)]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePolicy {
    checks: Vec<RouteCheck>,
}

impl RoutePolicy {
    /// Authenticate only.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Authenticate, then confirm the caller owns the addressed resource.
    pub fn owner_of(kind: ResourceKind) -> Self {
        Self::authenticated().then(RouteCheck::Owner(kind))
    }

    /// Authenticate, then require `role`.
    pub fn with_role(role: Role) -> Self {
        Self::authenticated().then(RouteCheck::Role(role))
    }

    /// Append a further check.
    pub fn then(mut self, check: RouteCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Build a policy from an explicit stage list.
    ///
    /// The list must start with [`Stage::Authenticate`] and contain it only
    /// once, since every later stage consumes the authenticated caller.
    pub fn from_stages(stages: &[Stage]) -> Result<Self, RoutePolicyError> {
        let (first, rest) = stages.split_first().ok_or(RoutePolicyError::Empty)?;
        if *first != Stage::Authenticate {
            return Err(RoutePolicyError::MissingAuthentication(*first));
        }
        let checks = rest
            .iter()
            .map(|stage| match stage {
                Stage::Authenticate => Err(RoutePolicyError::RepeatedAuthentication),
                Stage::Authorize(kind) => Ok(RouteCheck::Owner(*kind)),
                Stage::RequireRole(role) => Ok(RouteCheck::Role(*role)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { checks })
    }

    /// The resource kind whose id this route reads from its path, if any.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        self.checks.iter().find_map(|check| match check {
            RouteCheck::Owner(kind) => Some(*kind),
            RouteCheck::Role(_) => None,
        })
    }

    pub fn checks(&self) -> &[RouteCheck] {
        &self.checks
    }

    /// Full ordered stage list including the leading authentication.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        std::iter::once(Stage::Authenticate).chain(self.checks.iter().map(|c| Stage::from(*c)))
    }
}

/// Per-request inputs consumed by the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// Raw bearer credential; `None` when the header was absent or malformed.
    pub credential: Option<&'a str>,
    /// Resource id parsed from the path, or 0 when unparsable.
    pub resource_id: ResourceId,
}

impl<'a> AccessRequest<'a> {
    pub fn new(credential: Option<&'a str>, resource_id: ResourceId) -> Self {
        Self {
            credential,
            resource_id,
        }
    }
}

/// Runs a [`RoutePolicy`] against a request, stopping at the first failure.
#[derive(Clone)]
pub struct AccessPipeline {
    authentication: AuthenticationStage,
    locator: Arc<dyn ResourceLocator>,
}

impl AccessPipeline {
    pub fn new(authentication: AuthenticationStage, locator: Arc<dyn ResourceLocator>) -> Self {
        Self {
            authentication,
            locator,
        }
    }

    /// Execute every stage of `policy` in order.
    ///
    /// Returns the authenticated caller when all stages pass. The first
    /// failing stage's error is returned unchanged and later stages are not
    /// run.
    pub async fn admit(
        &self,
        policy: &RoutePolicy,
        request: AccessRequest<'_>,
    ) -> Result<CallerIdentity, Error> {
        let raw = request.credential.ok_or_else(|| {
            debug!("bearer credential absent or malformed");
            invalid_token()
        })?;
        let caller = self.authentication.authenticate(raw).await?;

        for check in policy.checks() {
            match *check {
                RouteCheck::Owner(kind) => {
                    OwnershipGuard::new(kind, Arc::clone(&self.locator))
                        .authorize(caller, request.resource_id)
                        .await?;
                }
                RouteCheck::Role(role) => require_role(caller, role)?,
            }
        }

        Ok(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{INVALID_TOKEN, ROLE_REQUIRED_MESSAGE};
    use crate::domain::ports::{MockCredentialVerifier, MockIdentityStore, MockResourceLocator};
    use crate::domain::{
        Account, AccountId, CredentialClaims, Email, ErrorKind, PasswordHash, ResourceOwnership,
    };
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn account(id: i64) -> Account {
        Account::new(
            AccountId::new(id).expect("valid id"),
            Email::new(format!("user{id}@example.com")).expect("valid email"),
            format!("user{id}"),
            Role::Member,
            PasswordHash::new("unused-hash"),
        )
    }

    fn verifier_for(subject: i64, role: Option<Role>) -> MockCredentialVerifier {
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify().returning(move |_| {
            let now = Utc::now();
            Ok(CredentialClaims::new(
                AccountId::new(subject).expect("valid id"),
                role,
                now,
                now + Duration::hours(1),
            ))
        });
        verifier
    }

    fn identities() -> MockIdentityStore {
        let mut identities = MockIdentityStore::new();
        identities
            .expect_fetch_by_id()
            .returning(|id| Ok(account(id.get())));
        identities
    }

    fn pipeline(
        verifier: MockCredentialVerifier,
        locator: MockResourceLocator,
    ) -> AccessPipeline {
        AccessPipeline::new(
            AuthenticationStage::new(Arc::new(verifier), Arc::new(identities())),
            Arc::new(locator),
        )
    }

    fn owner_locator(owner: i64) -> MockResourceLocator {
        let mut locator = MockResourceLocator::new();
        locator.expect_fetch_owner().returning(move |_, id| {
            Ok(ResourceOwnership::new(
                id,
                AccountId::new(owner).expect("valid id"),
            ))
        });
        locator
    }

    #[rstest]
    #[case(&[Stage::Authenticate], Ok(RoutePolicy::authenticated()))]
    #[case(
        &[Stage::Authenticate, Stage::Authorize(ResourceKind::Task)],
        Ok(RoutePolicy::owner_of(ResourceKind::Task))
    )]
    #[case(&[], Err(RoutePolicyError::Empty))]
    #[case(
        &[Stage::RequireRole(Role::Admin)],
        Err(RoutePolicyError::MissingAuthentication(Stage::RequireRole(Role::Admin)))
    )]
    #[case(
        &[Stage::Authenticate, Stage::Authenticate],
        Err(RoutePolicyError::RepeatedAuthentication)
    )]
    fn stage_lists_must_lead_with_authentication(
        #[case] stages: &[Stage],
        #[case] expected: Result<RoutePolicy, RoutePolicyError>,
    ) {
        assert_eq!(RoutePolicy::from_stages(stages), expected);
    }

    #[rstest]
    fn resource_kind_follows_first_ownership_check() {
        assert_eq!(RoutePolicy::authenticated().resource_kind(), None);
        assert_eq!(RoutePolicy::with_role(Role::Admin).resource_kind(), None);
        assert_eq!(
            RoutePolicy::with_role(Role::Admin)
                .then(RouteCheck::Owner(ResourceKind::Product))
                .resource_kind(),
            Some(ResourceKind::Product)
        );
    }

    #[tokio::test]
    async fn missing_credential_is_unauthenticated_without_lookups() {
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify().never();
        let mut locator = MockResourceLocator::new();
        locator.expect_fetch_owner().never();

        let err = pipeline(verifier, locator)
            .admit(
                &RoutePolicy::owner_of(ResourceKind::Photo),
                AccessRequest::new(None, ResourceId::new(42)),
            )
            .await
            .expect_err("no credential");
        assert_eq!(err, Error::unauthenticated(INVALID_TOKEN));
    }

    #[tokio::test]
    async fn failed_authentication_skips_authorization() {
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify()
            .returning(|_| Err(Error::unauthenticated("expired")));
        let mut locator = MockResourceLocator::new();
        locator.expect_fetch_owner().never();

        let err = pipeline(verifier, locator)
            .admit(
                &RoutePolicy::owner_of(ResourceKind::Photo),
                AccessRequest::new(Some("stale"), ResourceId::new(42)),
            )
            .await
            .expect_err("expired credential");
        assert_eq!(err.message(), INVALID_TOKEN);
    }

    #[rstest]
    #[case(7, true)]
    #[case(9, false)]
    #[tokio::test]
    async fn ownership_decides_admission(#[case] owner: i64, #[case] admitted: bool) {
        let result = pipeline(verifier_for(7, None), owner_locator(owner))
            .admit(
                &RoutePolicy::owner_of(ResourceKind::Photo),
                AccessRequest::new(Some("token"), ResourceId::new(42)),
            )
            .await;

        match result {
            Ok(caller) => {
                assert!(admitted);
                assert_eq!(caller.id().get(), 7);
            }
            Err(err) => {
                assert!(!admitted);
                assert_eq!(err.kind(), ErrorKind::Unauthorized);
            }
        }
    }

    #[tokio::test]
    async fn role_gate_runs_without_resource_lookup() {
        let mut locator = MockResourceLocator::new();
        locator.expect_fetch_owner().never();

        let err = pipeline(verifier_for(7, Some(Role::Member)), locator)
            .admit(
                &RoutePolicy::with_role(Role::Admin),
                AccessRequest::new(Some("token"), ResourceId::new(1)),
            )
            .await
            .expect_err("member on admin route");
        assert_eq!(err, Error::unauthorized(ROLE_REQUIRED_MESSAGE));
    }

    #[tokio::test]
    async fn first_failing_check_stops_the_pipeline() {
        let mut locator = MockResourceLocator::new();
        locator.expect_fetch_owner().never();
        let policy =
            RoutePolicy::with_role(Role::Admin).then(RouteCheck::Owner(ResourceKind::Category));

        let err = pipeline(verifier_for(7, None), locator)
            .admit(&policy, AccessRequest::new(Some("token"), ResourceId::new(5)))
            .await
            .expect_err("role check fails first");
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}
