//! Request access pipeline: credential authentication, ownership and role
//! checks in front of resource mutations, with one error envelope for every
//! failure.

pub mod doc;
pub mod domain;
pub mod fixtures;
pub mod inbound;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
