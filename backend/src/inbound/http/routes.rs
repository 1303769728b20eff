//! Route table: every protected route and the stage list it runs.
//!
//! ```text
//! PUT|DELETE   /photos/{photoId}              authenticate, authorize(photo)
//! PUT|DELETE   /comments/{commentId}          authenticate, authorize(comment)
//! PUT|DELETE   /socialmedias/{socialMediaId}  authenticate, authorize(social media)
//! PUT|DELETE   /tasks/{taskId}                authenticate, authorize(task)
//! PATCH        /tasks/update-status/{taskId}  authenticate, authorize(task)
//! PATCH|DELETE /categories/{categoryId}       authenticate, require_role(admin)
//! PUT|DELETE   /products/{productId}          authenticate, authorize(product)
//! GET          /users/me                      authenticate
//! POST         /users/login                   public
//! POST         /users/register                public
//! ```

use actix_web::{Route, web};

use crate::domain::auth::{AccessPipeline, RoutePolicy};
use crate::domain::{ResourceKind, Role};
use crate::inbound::http::access::AccessControl;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::resources::{
    delete_category, delete_comment, delete_photo, delete_product, delete_social_media,
    delete_task, update_category, update_comment, update_photo, update_product,
    update_social_media, update_task, update_task_status,
};
use crate::inbound::http::users::{current_user, login, register};

/// Route pattern for toggling a task's completion status.
pub const TASK_STATUS_PATH: &str = "/tasks/update-status/{taskId}";

/// URL collection segment for a resource kind.
pub fn collection_segment(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Photo => "photos",
        ResourceKind::Comment => "comments",
        ResourceKind::SocialMedia => "socialmedias",
        ResourceKind::Task => "tasks",
        ResourceKind::Category => "categories",
        ResourceKind::Product => "products",
    }
}

/// Route pattern for a single resource, e.g. `/photos/{photoId}`.
///
/// # Examples
/// ```
/// use access_pipeline::domain::ResourceKind;
/// use access_pipeline::inbound::http::routes::resource_path;
///
/// assert_eq!(resource_path(ResourceKind::SocialMedia), "/socialmedias/{socialMediaId}");
/// ```
pub fn resource_path(kind: ResourceKind) -> String {
    format!("/{}/{{{}}}", collection_segment(kind), kind.path_param())
}

/// Stage list guarding mutations of `kind`.
///
/// Categories are shared reference data and are gated by role rather than
/// ownership.
pub fn mutation_policy(kind: ResourceKind) -> RoutePolicy {
    match kind {
        ResourceKind::Category => RoutePolicy::with_role(Role::Admin),
        other => RoutePolicy::owner_of(other),
    }
}

fn delete_route(kind: ResourceKind) -> Route {
    match kind {
        ResourceKind::Photo => web::delete().to(delete_photo),
        ResourceKind::Comment => web::delete().to(delete_comment),
        ResourceKind::SocialMedia => web::delete().to(delete_social_media),
        ResourceKind::Task => web::delete().to(delete_task),
        ResourceKind::Category => web::delete().to(delete_category),
        ResourceKind::Product => web::delete().to(delete_product),
    }
}

fn update_route(kind: ResourceKind) -> Route {
    match kind {
        ResourceKind::Photo => web::put().to(update_photo),
        ResourceKind::Comment => web::put().to(update_comment),
        ResourceKind::SocialMedia => web::put().to(update_social_media),
        ResourceKind::Task => web::put().to(update_task),
        ResourceKind::Category => web::patch().to(update_category),
        ResourceKind::Product => web::put().to(update_product),
    }
}

/// Register every route with its access policy.
///
/// Expects `web::Data<HttpState>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig, pipeline: &AccessPipeline) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::resource("/users/login").route(web::post().to(login)))
        .service(web::resource("/users/register").route(web::post().to(register)))
        .service(
            web::resource(TASK_STATUS_PATH)
                .wrap(AccessControl::new(
                    pipeline.clone(),
                    mutation_policy(ResourceKind::Task),
                ))
                .route(web::patch().to(update_task_status)),
        )
        .service(
            web::resource("/users/me")
                .wrap(AccessControl::new(
                    pipeline.clone(),
                    RoutePolicy::authenticated(),
                ))
                .route(web::get().to(current_user)),
        );

    for kind in ResourceKind::ALL {
        cfg.service(
            web::resource(resource_path(kind))
                .wrap(AccessControl::new(pipeline.clone(), mutation_policy(kind)))
                .route(update_route(kind))
                .route(delete_route(kind)),
        );
    }
}
