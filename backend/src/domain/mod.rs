//! Domain primitives, ports, and the access pipeline.
//!
//! Purpose: define strongly typed values shared by the HTTP and persistence
//! layers and the services that decide whether a request may proceed. Keep
//! types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorKind: tagged failure carried across every layer.
//! - Account / AccountId / Role: identity records from the identity store.
//! - CallerIdentity: the authenticated caller for one request.
//! - ResourceKind / ResourceId / ResourceOwnership: ownership lookups.
//! - ResourceUpdate: validated field changes for guarded resources.
//! - Registration / RegistrationService: self-service member accounts.
//! - auth: authentication, authorization, and login services.
//! - ports: traits implemented by outbound adapters.

pub mod account;
pub mod auth;
pub mod caller;
pub mod credential;
pub mod error;
pub mod login;
pub mod ports;
pub mod registration;
pub mod resource;
pub mod resource_update;

pub use self::account::{Account, AccountId, AccountValidationError, Email, PasswordHash, Role};
pub use self::caller::CallerIdentity;
pub use self::credential::{Credential, CredentialClaims};
pub use self::error::{Error, ErrorKind, ErrorValidationError, INTERNAL_MESSAGE};
pub use self::login::{LoginCredentials, LoginValidationError};
pub use self::registration::{
    ACCOUNT_EXISTS, NewAccount, PASSWORD_MIN_LEN, Registration, RegistrationService,
    RegistrationValidationError,
};
pub use self::resource::{ResourceId, ResourceKind, ResourceOwnership};
pub use self::resource_update::{ResourceUpdate, ResourceValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use access_pipeline::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
