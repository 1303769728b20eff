//! HTTP inbound adapter: access control, error translation and handlers.

pub mod access;
pub mod bearer;
pub mod caller;
pub mod credential_config;
pub mod error;
pub mod health;
pub mod resources;
pub mod routes;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
