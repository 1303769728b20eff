//! Request access pipeline: authentication, ownership and role checks.
//!
//! Control flow for a protected request is strictly sequential:
//! authenticate, then the route's optional checks, then the business handler.
//! The first failing stage ends the request.

mod authentication;
mod authorization;
mod login_service;
mod pipeline;

pub use authentication::{AuthenticationStage, INVALID_TOKEN};
pub use authorization::{OwnershipGuard, ROLE_REQUIRED_MESSAGE, require_role};
pub use login_service::{INVALID_LOGIN, LoginService};
pub use pipeline::{AccessPipeline, AccessRequest, RouteCheck, RoutePolicy, RoutePolicyError, Stage};
