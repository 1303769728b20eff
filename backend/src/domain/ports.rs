//! Domain ports for the hexagonal boundary.
//!
//! Every collaborator the access pipeline and login service depend on is a
//! trait object injected through constructors. Production wiring passes
//! Diesel or cryptographic adapters; tests pass the fixtures below or the
//! generated `mockall` mocks.

mod credential;
mod identity_store;
mod password_hasher;
mod resource_locator;
mod resource_repository;

#[cfg(test)]
pub use credential::{MockCredentialIssuer, MockCredentialVerifier};
pub use credential::{CredentialIssuer, CredentialVerifier};
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{FixtureIdentityStore, IdentityStore};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::PasswordHasher;
#[cfg(test)]
pub use resource_locator::MockResourceLocator;
pub use resource_locator::{FixtureResourceStore, ResourceLocator};
#[cfg(test)]
pub use resource_repository::MockResourceRepository;
pub use resource_repository::ResourceRepository;
