//! Update and delete handlers for owner-guarded resources.
//!
//! Each handler runs only after the access middleware has admitted the
//! caller, so the handler itself validates the body and performs the
//! single-row write and nothing else. Bodies are never read for callers the
//! middleware rejects.

use actix_web::{HttpRequest, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::domain::{Error, ResourceId, ResourceKind, ResourceUpdate, ResourceValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Confirmation returned by successful deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(example = 200)]
    pub status_code: u16,
    #[schema(example = "your photo has been successfully deleted")]
    pub message: String,
}

/// Confirmation returned by successful updates.
///
/// `data` echoes the resource id and the fields written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdatedResponse {
    #[schema(example = 200)]
    pub status_code: u16,
    #[schema(example = "your photo has been successfully updated")]
    pub message: String,
    #[schema(value_type = Object)]
    pub data: Value,
}

/// Update body for `PUT /photos/{photoId}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoUpdateRequest {
    #[schema(example = "sunset")]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[schema(example = "https://img.example.com/1.jpg")]
    pub photo_url: String,
}

/// Update body for `PUT /comments/{commentId}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentUpdateRequest {
    #[schema(example = "lovely light")]
    pub message: String,
}

/// Update body for `PUT /socialmedias/{socialMediaId}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SocialMediaUpdateRequest {
    #[schema(example = "mastodon")]
    pub name: String,
    #[schema(example = "https://mastodon.social/@ada")]
    pub social_media_url: String,
}

/// Update body for `PUT /tasks/{taskId}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskUpdateRequest {
    pub title: String,
    pub description: String,
}

/// Update body for `PATCH /tasks/update-status/{taskId}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskStatusRequest {
    pub status: bool,
}

/// Update body for `PATCH /categories/{categoryId}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryUpdateRequest {
    #[serde(rename = "type")]
    #[schema(example = "books")]
    pub category_type: String,
}

/// Update body for `PUT /products/{productId}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductUpdateRequest {
    pub title: String,
    #[schema(minimum = 0)]
    pub price: i64,
}

fn map_update_validation_error(err: ResourceValidationError) -> Error {
    Error::bad_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

fn updated_data(id: ResourceId, update: &ResourceUpdate) -> Result<Value, Error> {
    let mut data = serde_json::to_value(update).map_err(|err| {
        error!(%err, "resource update not serialisable");
        Error::opaque_internal()
    })?;
    if let Value::Object(fields) = &mut data {
        fields.insert("id".to_owned(), Value::from(id.get()));
    }
    Ok(data)
}

async fn update_resource(
    state: &HttpState,
    caller: Caller,
    req: &HttpRequest,
    update: Result<ResourceUpdate, ResourceValidationError>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let update = update.map_err(map_update_validation_error)?;
    let kind = update.kind();
    let id = ResourceId::from_path_segment(req.match_info().get(kind.path_param()));
    state.resources.update(id, &update).await.map_err(|error| {
        if error.is_not_found() {
            Error::bad_request(kind.not_found_message())
        } else {
            error
        }
    })?;
    info!(%kind, %id, caller = %caller.id(), "resource updated");
    Ok(web::Json(UpdatedResponse {
        status_code: 200,
        message: format!("your {} has been successfully updated", kind.label()),
        data: updated_data(id, &update)?,
    }))
}

/// Update a photo owned by the caller.
#[utoipa::path(
    put,
    path = "/photos/{photoId}",
    params(("photoId" = i64, Path, description = "Photo id")),
    request_body = PhotoUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = UpdatedResponse),
        (status = 400, description = "Invalid body or photo not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the photo", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "updatePhoto",
    security(("bearer" = []))
)]
pub async fn update_photo(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
    payload: web::Json<PhotoUpdateRequest>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let body = payload.into_inner();
    let update = ResourceUpdate::photo(&body.title, &body.caption, &body.photo_url);
    update_resource(&state, caller, &req, update).await
}

/// Update a comment owned by the caller.
#[utoipa::path(
    put,
    path = "/comments/{commentId}",
    params(("commentId" = i64, Path, description = "Comment id")),
    request_body = CommentUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = UpdatedResponse),
        (status = 400, description = "Invalid body or comment not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the comment", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "updateComment",
    security(("bearer" = []))
)]
pub async fn update_comment(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
    payload: web::Json<CommentUpdateRequest>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let update = ResourceUpdate::comment(&payload.message);
    update_resource(&state, caller, &req, update).await
}

/// Update a social media link owned by the caller.
#[utoipa::path(
    put,
    path = "/socialmedias/{socialMediaId}",
    params(("socialMediaId" = i64, Path, description = "Social media id")),
    request_body = SocialMediaUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = UpdatedResponse),
        (status = 400, description = "Invalid body or social media not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the link", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "updateSocialMedia",
    security(("bearer" = []))
)]
pub async fn update_social_media(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
    payload: web::Json<SocialMediaUpdateRequest>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let update = ResourceUpdate::social_media(&payload.name, &payload.social_media_url);
    update_resource(&state, caller, &req, update).await
}

/// Replace the title and description of a task owned by the caller.
#[utoipa::path(
    put,
    path = "/tasks/{taskId}",
    params(("taskId" = i64, Path, description = "Task id")),
    request_body = TaskUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = UpdatedResponse),
        (status = 400, description = "Invalid body or task not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the task", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "updateTask",
    security(("bearer" = []))
)]
pub async fn update_task(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
    payload: web::Json<TaskUpdateRequest>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let update = ResourceUpdate::task(&payload.title, &payload.description);
    update_resource(&state, caller, &req, update).await
}

/// Mark a task owned by the caller as done or pending.
#[utoipa::path(
    patch,
    path = "/tasks/update-status/{taskId}",
    params(("taskId" = i64, Path, description = "Task id")),
    request_body = TaskStatusRequest,
    responses(
        (status = 200, description = "Updated", body = UpdatedResponse),
        (status = 400, description = "Task not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the task", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "updateTaskStatus",
    security(("bearer" = []))
)]
pub async fn update_task_status(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
    payload: web::Json<TaskStatusRequest>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let update = Ok(ResourceUpdate::task_status(payload.status));
    update_resource(&state, caller, &req, update).await
}

/// Rename a category. Admin only.
#[utoipa::path(
    patch,
    path = "/categories/{categoryId}",
    params(("categoryId" = i64, Path, description = "Category id")),
    request_body = CategoryUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = UpdatedResponse),
        (status = 400, description = "Invalid body or category not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller is not an admin", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "updateCategory",
    security(("bearer" = []))
)]
pub async fn update_category(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
    payload: web::Json<CategoryUpdateRequest>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let update = ResourceUpdate::category(&payload.category_type);
    update_resource(&state, caller, &req, update).await
}

/// Update a product owned by the caller.
#[utoipa::path(
    put,
    path = "/products/{productId}",
    params(("productId" = i64, Path, description = "Product id")),
    request_body = ProductUpdateRequest,
    responses(
        (status = 200, description = "Updated", body = UpdatedResponse),
        (status = 400, description = "Invalid body or product not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the product", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "updateProduct",
    security(("bearer" = []))
)]
pub async fn update_product(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
    payload: web::Json<ProductUpdateRequest>,
) -> ApiResult<web::Json<UpdatedResponse>> {
    let update = ResourceUpdate::product(&payload.title, payload.price);
    update_resource(&state, caller, &req, update).await
}

async fn delete_resource(
    state: &HttpState,
    caller: Caller,
    req: &HttpRequest,
    kind: ResourceKind,
) -> ApiResult<web::Json<DeletedResponse>> {
    let id = ResourceId::from_path_segment(req.match_info().get(kind.path_param()));
    state.resources.delete(kind, id).await.map_err(|error| {
        if error.is_not_found() {
            Error::bad_request(kind.not_found_message())
        } else {
            error
        }
    })?;
    info!(%kind, %id, caller = %caller.id(), "resource deleted");
    Ok(web::Json(DeletedResponse {
        status_code: 200,
        message: format!("your {} has been successfully deleted", kind.label()),
    }))
}

/// Delete a photo owned by the caller.
#[utoipa::path(
    delete,
    path = "/photos/{photoId}",
    params(("photoId" = i64, Path, description = "Photo id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedResponse),
        (status = 400, description = "Photo not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the photo", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "deletePhoto",
    security(("bearer" = []))
)]
pub async fn delete_photo(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
) -> ApiResult<web::Json<DeletedResponse>> {
    delete_resource(&state, caller, &req, ResourceKind::Photo).await
}

/// Delete a comment owned by the caller.
#[utoipa::path(
    delete,
    path = "/comments/{commentId}",
    params(("commentId" = i64, Path, description = "Comment id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedResponse),
        (status = 400, description = "Comment not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the comment", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "deleteComment",
    security(("bearer" = []))
)]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
) -> ApiResult<web::Json<DeletedResponse>> {
    delete_resource(&state, caller, &req, ResourceKind::Comment).await
}

/// Delete a social media link owned by the caller.
#[utoipa::path(
    delete,
    path = "/socialmedias/{socialMediaId}",
    params(("socialMediaId" = i64, Path, description = "Social media id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedResponse),
        (status = 400, description = "Social media not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the link", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "deleteSocialMedia",
    security(("bearer" = []))
)]
pub async fn delete_social_media(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
) -> ApiResult<web::Json<DeletedResponse>> {
    delete_resource(&state, caller, &req, ResourceKind::SocialMedia).await
}

/// Delete a task owned by the caller.
#[utoipa::path(
    delete,
    path = "/tasks/{taskId}",
    params(("taskId" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedResponse),
        (status = 400, description = "Task not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the task", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "deleteTask",
    security(("bearer" = []))
)]
pub async fn delete_task(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
) -> ApiResult<web::Json<DeletedResponse>> {
    delete_resource(&state, caller, &req, ResourceKind::Task).await
}

/// Delete a category. Admin only.
#[utoipa::path(
    delete,
    path = "/categories/{categoryId}",
    params(("categoryId" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedResponse),
        (status = 400, description = "Category not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller is not an admin", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "deleteCategory",
    security(("bearer" = []))
)]
pub async fn delete_category(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
) -> ApiResult<web::Json<DeletedResponse>> {
    delete_resource(&state, caller, &req, ResourceKind::Category).await
}

/// Delete a product owned by the caller.
#[utoipa::path(
    delete,
    path = "/products/{productId}",
    params(("productId" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted", body = DeletedResponse),
        (status = 400, description = "Product not found", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorEnvelope),
        (status = 403, description = "Caller does not own the product", body = ErrorEnvelope)
    ),
    tags = ["resources"],
    operation_id = "deleteProduct",
    security(("bearer" = []))
)]
pub async fn delete_product(
    state: web::Data<HttpState>,
    caller: Caller,
    req: HttpRequest,
) -> ApiResult<web::Json<DeletedResponse>> {
    delete_resource(&state, caller, &req, ResourceKind::Product).await
}
