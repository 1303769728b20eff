//! Seed accounts and resources for database-less runs.
//!
//! The server wires these into the in-memory adapters when no database URL
//! is configured; tests use them as a small known world.

use crate::domain::ports::{FixtureIdentityStore, FixtureResourceStore, PasswordHasher};
use crate::domain::{
    Account, AccountId, AccountValidationError, Email, Error, ResourceId, ResourceKind,
    ResourceOwnership, Role,
};

/// Seed account description: id, email, username, role, plaintext password.
pub const SEED_ACCOUNTS: [(i64, &str, &str, Role, &str); 3] = [
    (1, "admin@example.com", "admin", Role::Admin, "admin-password"),
    (7, "ada@example.com", "ada", Role::Member, "ada-password"),
    (9, "bob@example.com", "bob", Role::Member, "bob-password"),
];

/// Seed resources: kind, resource id, owner id.
pub const SEED_RESOURCES: [(ResourceKind, i64, i64); 8] = [
    (ResourceKind::Photo, 42, 9),
    (ResourceKind::Photo, 43, 7),
    (ResourceKind::Comment, 11, 7),
    (ResourceKind::SocialMedia, 5, 9),
    (ResourceKind::Task, 3, 7),
    (ResourceKind::Category, 2, 1),
    (ResourceKind::Product, 8, 7),
    (ResourceKind::Product, 12, 9),
];

fn invalid_seed(err: AccountValidationError) -> Error {
    Error::internal(format!("invalid seed data: {err}"))
}

/// Build the seed accounts, hashing each password with `hasher`.
pub fn seed_accounts(hasher: &dyn PasswordHasher) -> Result<Vec<Account>, Error> {
    SEED_ACCOUNTS
        .iter()
        .map(|(id, email, username, role, password)| {
            Ok(Account::new(
                AccountId::new(*id).map_err(invalid_seed)?,
                Email::new(email).map_err(invalid_seed)?,
                *username,
                *role,
                hasher.hash(password)?,
            ))
        })
        .collect()
}

/// Build the seed ownership records.
pub fn seed_resources() -> Result<Vec<(ResourceKind, ResourceOwnership)>, Error> {
    SEED_RESOURCES
        .iter()
        .map(|(kind, id, owner)| {
            let owner = AccountId::new(*owner).map_err(invalid_seed)?;
            Ok((*kind, ResourceOwnership::new(ResourceId::new(*id), owner)))
        })
        .collect()
}

/// In-memory identity store populated with [`SEED_ACCOUNTS`].
pub fn seeded_identity_store(hasher: &dyn PasswordHasher) -> Result<FixtureIdentityStore, Error> {
    Ok(FixtureIdentityStore::new(seed_accounts(hasher)?))
}

/// In-memory resource store populated with [`SEED_RESOURCES`].
pub fn seeded_resource_store() -> Result<FixtureResourceStore, Error> {
    Ok(FixtureResourceStore::new(seed_resources()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::password::Argon2PasswordHasher;
    use rstest::rstest;

    #[rstest]
    fn seed_passwords_are_hashed() {
        let hasher = Argon2PasswordHasher::new(8, 1).expect("argon2 cost");
        let accounts = seed_accounts(&hasher).expect("seed accounts");
        assert_eq!(accounts.len(), SEED_ACCOUNTS.len());
        for (account, (_, _, _, _, password)) in accounts.iter().zip(SEED_ACCOUNTS) {
            assert_ne!(account.password_hash().as_ref(), password);
            assert!(hasher.compare(account.password_hash(), password));
        }
    }

    #[rstest]
    fn every_kind_has_a_seed_resource() {
        let resources = seed_resources().expect("seed resources");
        for kind in ResourceKind::ALL {
            assert!(resources.iter().any(|(k, _)| *k == kind), "{kind} missing");
        }
    }
}
