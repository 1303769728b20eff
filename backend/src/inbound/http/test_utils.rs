//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::Duration;
use mockable::DefaultClock;

use crate::domain::auth::{AccessPipeline, AuthenticationStage, LoginService};
use crate::domain::ports::{
    CredentialIssuer, FixtureIdentityStore, FixtureResourceStore, IdentityStore,
};
use crate::domain::{AccountId, Credential, RegistrationService};
use crate::fixtures::{seeded_identity_store, seeded_resource_store};
use crate::inbound::http::state::HttpState;
use crate::outbound::credential::{HmacCredentialCodec, SigningKey};
use crate::outbound::password::Argon2PasswordHasher;

/// Seeded state plus the codec and concrete stores behind it.
pub struct TestHarness {
    pub state: HttpState,
    pub codec: Arc<HmacCredentialCodec>,
    pub accounts: Arc<FixtureIdentityStore>,
    pub resources: Arc<FixtureResourceStore>,
}

impl TestHarness {
    /// Build a harness over the seed accounts and resources.
    pub fn seeded() -> Self {
        let hasher = Arc::new(Argon2PasswordHasher::new(8, 1).expect("argon2 cost"));
        let accounts = Arc::new(seeded_identity_store(hasher.as_ref()).expect("seed accounts"));
        let identities: Arc<dyn IdentityStore> = accounts.clone();
        let resources = Arc::new(seeded_resource_store().expect("seed resources"));
        let codec = Arc::new(HmacCredentialCodec::new(
            SigningKey::from_bytes(vec![b't'; 32]),
            Duration::hours(1),
            Arc::new(DefaultClock),
        ));

        let pipeline = AccessPipeline::new(
            AuthenticationStage::new(codec.clone(), Arc::clone(&identities)),
            resources.clone(),
        );
        let registration = RegistrationService::new(Arc::clone(&identities), hasher.clone());
        let login = LoginService::new(Arc::clone(&identities), hasher, codec.clone());
        let state = HttpState::new(
            pipeline,
            login,
            registration,
            identities,
            resources.clone(),
        );
        Self {
            state,
            codec,
            accounts,
            resources,
        }
    }

    /// Issue a valid credential for seed account `id`.
    pub async fn credential_for(&self, id: i64) -> Credential {
        let account = self
            .state
            .identities
            .fetch_by_id(AccountId::new(id).expect("valid id"))
            .await
            .expect("seed account exists");
        self.codec.issue(&account).await.expect("issue credential")
    }

    /// `Authorization` header value for seed account `id`.
    pub async fn bearer_for(&self, id: i64) -> String {
        format!("Bearer {}", self.credential_for(id).await.as_str())
    }
}
