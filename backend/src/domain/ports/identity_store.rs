//! Driven port for account records.
//!
//! The authentication stage uses it to confirm that the subject named by a
//! credential still exists; the login service uses it to find an account by
//! email; registration inserts new accounts.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::error;

use crate::domain::{ACCOUNT_EXISTS, Account, AccountId, Email, Error, NewAccount};

/// Lookup and creation of full account records.
///
/// Implementations return [`crate::domain::ErrorKind::NotFound`] when no
/// record matches, `BadRequest` [`ACCOUNT_EXISTS`] when an insert collides
/// with an existing email or username, and
/// [`crate::domain::ErrorKind::Internal`] (with an opaque message) for any
/// storage failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch an account by its numeric id.
    async fn fetch_by_id(&self, id: AccountId) -> Result<Account, Error>;

    /// Fetch an account by its normalised email.
    async fn fetch_by_email(&self, email: &Email) -> Result<Account, Error>;

    /// Store `account` and return it with its assigned id.
    async fn insert(&self, account: NewAccount) -> Result<Account, Error>;
}

/// In-memory identity store used when no database is configured.
///
/// New accounts receive the next id after the highest one held.
#[derive(Debug, Default)]
pub struct FixtureIdentityStore {
    accounts: RwLock<BTreeMap<AccountId, Account>>,
}

impl FixtureIdentityStore {
    /// Build a store holding `accounts`; later duplicates replace earlier ones.
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: RwLock::new(
                accounts
                    .into_iter()
                    .map(|account| (account.id(), account))
                    .collect(),
            ),
        }
    }

    /// Drop account `id`, as an administrator removing it out of band would.
    pub fn remove(&self, id: AccountId) -> Result<Option<Account>, Error> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        Ok(accounts.remove(&id))
    }
}

fn poisoned() -> Error {
    error!("fixture identity store lock poisoned");
    Error::opaque_internal()
}

#[async_trait]
impl IdentityStore for FixtureIdentityStore {
    async fn fetch_by_id(&self, id: AccountId) -> Result<Account, Error> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn fetch_by_email(&self, email: &Email) -> Result<Account, Error> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        accounts
            .values()
            .find(|account| account.email() == email)
            .cloned()
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, Error> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        let taken = accounts.values().any(|existing| {
            existing.email() == account.email() || existing.username() == account.username()
        });
        if taken {
            return Err(Error::bad_request(ACCOUNT_EXISTS));
        }

        let next = accounts.keys().next_back().map_or(1, |id| id.get() + 1);
        let id = AccountId::new(next).map_err(|err| Error::internal(err.to_string()))?;
        let stored = Account::new(
            id,
            account.email().clone(),
            account.username(),
            account.role(),
            account.password_hash().clone(),
        );
        accounts.insert(id, stored.clone());
        Ok(stored)
    }
}
