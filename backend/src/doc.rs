//! OpenAPI documentation for the HTTP surface.
//!
//! Registers the account, resource update and deletion and health routes,
//! their payload schemas and the bearer credential scheme. Served through
//! Swagger UI in debug builds and printed by the `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::Role;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::resources::{
    CategoryUpdateRequest, CommentUpdateRequest, DeletedResponse, PhotoUpdateRequest,
    ProductUpdateRequest, SocialMediaUpdateRequest, TaskStatusRequest, TaskUpdateRequest,
    UpdatedResponse,
};
use crate::inbound::http::users::{
    CurrentUserResponse, LoginRequest, LoginResponse, RegisterRequest, RegisteredResponse,
};

/// Name of the bearer security scheme referenced by protected paths.
pub const BEARER_SCHEME: &str = "bearer";

struct BearerAddon;

impl Modify for BearerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let scheme = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("Credential issued by POST /users/login."))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAddon),
    info(
        title = "Access pipeline API",
        description = "Credential-authenticated resource mutations with ownership checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("bearer" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::resources::update_photo,
        crate::inbound::http::resources::update_comment,
        crate::inbound::http::resources::update_social_media,
        crate::inbound::http::resources::update_task,
        crate::inbound::http::resources::update_task_status,
        crate::inbound::http::resources::update_category,
        crate::inbound::http::resources::update_product,
        crate::inbound::http::resources::delete_photo,
        crate::inbound::http::resources::delete_comment,
        crate::inbound::http::resources::delete_social_media,
        crate::inbound::http::resources::delete_task,
        crate::inbound::http::resources::delete_category,
        crate::inbound::http::resources::delete_product,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        RegisterRequest,
        RegisteredResponse,
        LoginRequest,
        LoginResponse,
        CurrentUserResponse,
        DeletedResponse,
        UpdatedResponse,
        PhotoUpdateRequest,
        CommentUpdateRequest,
        SocialMediaUpdateRequest,
        TaskUpdateRequest,
        TaskStatusRequest,
        CategoryUpdateRequest,
        ProductUpdateRequest,
        Role
    )),
    tags(
        (name = "users", description = "Registration, login and caller profile"),
        (name = "resources", description = "Owner-guarded resource mutations"),
        (name = "health", description = "Orchestrator health checks")
    )
)]
pub struct ApiDoc;
