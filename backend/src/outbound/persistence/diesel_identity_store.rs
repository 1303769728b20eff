//! PostgreSQL-backed `IdentityStore`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::error::StorageError;
use super::models::{AccountRow, NewAccountRow};
use super::pool::DbPool;
use super::schema::users;
use crate::domain::ports::IdentityStore;
use crate::domain::{ACCOUNT_EXISTS, Account, AccountId, Email, Error, NewAccount};

const ENTITY: &str = "user";

/// Reads and inserts account records in the `users` table.
#[derive(Clone)]
pub struct DieselIdentityStore {
    pool: DbPool,
}

impl DieselIdentityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_account(row: Result<AccountRow, diesel::result::Error>) -> Result<Account, Error> {
    let row = row.map_err(|err| StorageError::from_diesel(ENTITY, err))?;
    Ok(Account::try_from(row)?)
}

#[async_trait]
impl IdentityStore for DieselIdentityStore {
    async fn fetch_by_id(&self, id: AccountId) -> Result<Account, Error> {
        let mut conn = self.pool.get().await.map_err(StorageError::from)?;
        let row = users::table
            .filter(users::id.eq(id.get()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await;
        to_account(row)
    }

    async fn fetch_by_email(&self, email: &Email) -> Result<Account, Error> {
        let mut conn = self.pool.get().await.map_err(StorageError::from)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await;
        to_account(row)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, Error> {
        let mut conn = self.pool.get().await.map_err(StorageError::from)?;
        let row = diesel::insert_into(users::table)
            .values(NewAccountRow::from(&account))
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match StorageError::from_diesel(ENTITY, err) {
                StorageError::Conflict { .. } => Error::bad_request(ACCOUNT_EXISTS),
                other => other.into(),
            })?;
        Ok(Account::try_from(row)?)
    }
}
