//! Users API handlers.
//!
//! ```text
//! POST /users/register {"email":"eve@example.com","username":"eve","password":"secret"}
//! POST /users/login    {"email":"ada@example.com","password":"ada-password"}
//! GET  /users/me       Authorization: Bearer <token>
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::auth::INVALID_TOKEN;
use crate::domain::{
    AccountValidationError, Error, LoginCredentials, LoginValidationError, Registration,
    RegistrationValidationError, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /users/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "ada-password")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Registration request body for `POST /users/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "eve@example.com")]
    pub email: String,
    #[schema(example = "eve")]
    pub username: String,
    #[schema(example = "secret", min_length = 6)]
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = RegistrationValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.username, &value.password)
    }
}

/// Account created by registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisteredResponse {
    #[schema(example = 10)]
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: Role,
}

/// Successful login payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Profile of the authenticated caller.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    #[schema(example = 7)]
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Role asserted by the credential used for this request.
    pub role: Option<Role>,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match &err {
        LoginValidationError::Email(email) => ("email", email_error_code(email)),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::bad_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn email_error_code(err: &AccountValidationError) -> &'static str {
    match err {
        AccountValidationError::EmptyEmail => "empty_email",
        AccountValidationError::MalformedEmail => "malformed_email",
        _ => "invalid_email",
    }
}

fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    let (field, code) = match &err {
        RegistrationValidationError::Email(email) => ("email", email_error_code(email)),
        RegistrationValidationError::EmptyUsername => ("username", "empty_username"),
        RegistrationValidationError::ShortPassword => ("password", "short_password"),
    };
    Error::bad_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Create a member account.
#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredResponse),
        (status = 400, description = "Invalid payload or account already exists", body = ErrorEnvelope),
        (status = 422, description = "Undecodable body", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())
        .map_err(map_registration_validation_error)?;
    let account = state.registration.register(&registration).await?;
    Ok(HttpResponse::Created().json(RegisteredResponse {
        id: account.id().get(),
        email: account.email().to_string(),
        username: account.username().to_owned(),
        role: account.role(),
    }))
}

/// Exchange email and password for a bearer credential.
#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid payload or credentials", body = ErrorEnvelope),
        (status = 422, description = "Undecodable body", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let credential = state.login.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        token: credential.into_inner(),
    }))
}

/// Return the authenticated caller's profile.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Caller profile", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("bearer" = []))
)]
pub async fn current_user(state: web::Data<HttpState>, caller: Caller) -> ApiResult<HttpResponse> {
    let account = state
        .identities
        .fetch_by_id(caller.id())
        .await
        .map_err(|error| {
            if error.is_not_found() {
                debug!(account = %caller.id(), "authenticated account vanished");
                Error::unauthenticated(INVALID_TOKEN)
            } else {
                error
            }
        })?;
    Ok(HttpResponse::Ok().json(CurrentUserResponse {
        id: account.id().get(),
        email: account.email().to_string(),
        username: account.username().to_owned(),
        role: caller.role(),
    }))
}

#[cfg(test)]
mod tests;
