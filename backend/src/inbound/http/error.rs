//! HTTP translation of domain errors.
//!
//! The domain [`Error`] stays transport agnostic; this module picks the
//! status code for each [`ErrorKind`] and renders the JSON envelope
//! `{"status_code", "message", "data", "details"?}`.

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorKind, INTERNAL_MESSAGE};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned when a request body cannot be decoded.
pub const INVALID_JSON_MESSAGE: &str = "invalid json body request";

/// External status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wire shape of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    #[schema(example = 403)]
    pub status_code: u16,
    #[schema(example = "you are not authorized to modify the photo")]
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    /// Build the envelope, dropping message and details of internal errors.
    pub fn from_error(error: &Error) -> Self {
        let status = status_for(error.kind());
        let (message, details) = if error.kind() == ErrorKind::Internal {
            (INTERNAL_MESSAGE.to_owned(), None)
        } else {
            (error.message().to_owned(), error.details().cloned())
        };
        Self {
            status_code: status.as_u16(),
            message,
            data: None,
            details,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    fn error_response(&self) -> HttpResponse {
        match self.kind() {
            ErrorKind::Internal => error!(reason = %self, "internal error reached HTTP boundary"),
            kind => info!(%kind, message = %self, "request failed"),
        }
        HttpResponse::build(self.status_code()).json(ErrorEnvelope::from_error(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::opaque_internal()
    }
}

/// `JsonConfig` error handler mapping undecodable bodies to 422.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use access_pipeline::inbound::http::error::json_error_handler;
///
/// let config = web::JsonConfig::default().error_handler(json_error_handler);
/// ```
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    info!(error = %err, "rejected undecodable JSON body");
    Error::unprocessable_entity(INVALID_JSON_MESSAGE).into()
}

#[cfg(test)]
mod tests;
