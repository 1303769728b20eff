//! Internal Diesel row structs. Never exposed outside the persistence layer.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::error::StorageError;
use super::schema::users;
use crate::domain::{Account, AccountId, Email, NewAccount, PasswordHash, Role};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "audit column selected for completeness")]
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StorageError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let row_id = row.id;
        let corrupt = move |err: crate::domain::AccountValidationError| {
            StorageError::query(format!("users row {row_id} is invalid: {err}"))
        };
        let id = AccountId::new(row.id).map_err(corrupt)?;
        let email = Email::new(&row.email).map_err(corrupt)?;
        let role = Role::from_str(&row.role).map_err(corrupt)?;
        Ok(Account::new(
            id,
            email,
            row.username,
            role,
            PasswordHash::new(row.password_hash),
        ))
    }
}

/// Row written to `users` on registration; `id` and `created_at` use
/// column defaults.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewAccountRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub role: &'a str,
    pub password_hash: &'a str,
}

impl<'a> From<&'a NewAccount> for NewAccountRow<'a> {
    fn from(account: &'a NewAccount) -> Self {
        Self {
            email: account.email().as_ref(),
            username: account.username(),
            role: account.role().as_str(),
            password_hash: account.password_hash().as_ref(),
        }
    }
}

/// Minimal projection used by ownership lookups on every resource table.
#[derive(Debug, Clone, Copy, Queryable)]
pub(crate) struct OwnershipRow {
    pub id: i64,
    pub user_id: i64,
}
