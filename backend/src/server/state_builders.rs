//! Builders choosing database or fixture adapters for the HTTP state.

use std::sync::Arc;

use access_pipeline::domain::{Error, RegistrationService};
use access_pipeline::domain::auth::{AccessPipeline, AuthenticationStage, LoginService};
use access_pipeline::domain::ports::{IdentityStore, ResourceLocator, ResourceRepository};
use access_pipeline::fixtures::{seeded_identity_store, seeded_resource_store};
use access_pipeline::inbound::http::state::HttpState;
use access_pipeline::outbound::credential::HmacCredentialCodec;
use access_pipeline::outbound::password::Argon2PasswordHasher;
use access_pipeline::outbound::persistence::{DbPool, DieselIdentityStore, DieselResourceStore};
use mockable::DefaultClock;
use tracing::{info, warn};

use super::ServerConfig;

struct Stores {
    identities: Arc<dyn IdentityStore>,
    locator: Arc<dyn ResourceLocator>,
    repository: Arc<dyn ResourceRepository>,
}

fn database_stores(pool: &DbPool) -> Stores {
    info!("using PostgreSQL adapters");
    let resources = Arc::new(DieselResourceStore::new(pool.clone()));
    Stores {
        identities: Arc::new(DieselIdentityStore::new(pool.clone())),
        locator: resources.clone(),
        repository: resources,
    }
}

fn fixture_stores(hasher: &Argon2PasswordHasher) -> Result<Stores, Error> {
    warn!("no database configured; serving in-memory seed data");
    let resources = Arc::new(seeded_resource_store()?);
    Ok(Stores {
        identities: Arc::new(seeded_identity_store(hasher)?),
        locator: resources.clone(),
        repository: resources,
    })
}

/// Assemble the handler state from `config`.
///
/// # Errors
///
/// Fails when the hashing cost is rejected or the fixture seed accounts
/// cannot be hashed.
pub fn build_http_state(config: &ServerConfig) -> Result<HttpState, Error> {
    let hasher = Arc::new(
        Argon2PasswordHasher::new(config.password_memory_kib, config.password_iterations)
            .map_err(|err| Error::internal(err.to_string()))?,
    );
    let stores = match &config.db_pool {
        Some(pool) => database_stores(pool),
        None => fixture_stores(hasher.as_ref())?,
    };

    let codec = Arc::new(HmacCredentialCodec::new(
        config.credential.key.clone(),
        config.credential.lifetime,
        Arc::new(DefaultClock),
    ));
    let authentication = AuthenticationStage::new(codec.clone(), Arc::clone(&stores.identities));
    let pipeline = AccessPipeline::new(authentication, stores.locator);
    let registration = RegistrationService::new(Arc::clone(&stores.identities), hasher.clone());
    let login = LoginService::new(Arc::clone(&stores.identities), hasher, codec);

    Ok(HttpState::new(
        pipeline,
        login,
        registration,
        stores.identities,
        stores.repository,
    ))
}
