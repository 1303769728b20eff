//! Account registration: payload validation and the service creating
//! member accounts.
//!
//! The service owns hashing and role assignment so the inbound adapter only
//! translates the created [`Account`] into a transport payload.

use std::sync::Arc;

use tracing::info;
use zeroize::Zeroizing;

use super::ports::{IdentityStore, PasswordHasher};
use super::{Account, AccountValidationError, Email, Error, PasswordHash, Role};

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Message returned when the email or username is already registered.
pub const ACCOUNT_EXISTS: &str = "email or username already registered";

/// Domain error returned when registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error("{0}")]
    Email(AccountValidationError),
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must be at least {PASSWORD_MIN_LEN} characters")]
    ShortPassword,
}

/// Validated registration request.
///
/// ## Invariants
/// - `email` is normalised as by [`Email::new`].
/// - `username` is trimmed and non-empty.
/// - `password` has at least [`PASSWORD_MIN_LEN`] characters.
///
/// # Examples
/// ```
/// use access_pipeline::domain::Registration;
///
/// let registration = Registration::try_from_parts("Eve@Example.com", " eve ", "secret").unwrap();
/// assert_eq!(registration.email().as_ref(), "eve@example.com");
/// assert_eq!(registration.username(), "eve");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    username: String,
    password: Zeroizing<String>,
}

impl Registration {
    pub fn try_from_parts(
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let email = Email::new(email).map_err(RegistrationValidationError::Email)?;
        let username = username.trim();
        if username.is_empty() {
            return Err(RegistrationValidationError::EmptyUsername);
        }
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(RegistrationValidationError::ShortPassword);
        }
        Ok(Self {
            email,
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Account awaiting insertion. The identity store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    email: Email,
    username: String,
    role: Role,
    password_hash: PasswordHash,
}

impl NewAccount {
    pub fn new(
        email: Email,
        username: impl Into<String>,
        role: Role,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            email,
            username: username.into(),
            role,
            password_hash,
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// Creates member accounts from validated registrations.
#[derive(Clone)]
pub struct RegistrationService {
    identities: Arc<dyn IdentityStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegistrationService {
    pub fn new(identities: Arc<dyn IdentityStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { identities, hasher }
    }

    /// Hash the password and store a new account with [`Role::Member`].
    ///
    /// Self-service registration never grants [`Role::Admin`]. Duplicate
    /// emails or usernames surface as `BadRequest` [`ACCOUNT_EXISTS`] from
    /// the store.
    pub async fn register(&self, registration: &Registration) -> Result<Account, Error> {
        let password_hash = self.hasher.hash(registration.password())?;
        let account = self
            .identities
            .insert(NewAccount::new(
                registration.email().clone(),
                registration.username(),
                Role::Member,
                password_hash,
            ))
            .await?;
        info!(account = %account.id(), "account registered");
        Ok(account)
    }
}
