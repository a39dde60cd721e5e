//! Admin descriptor endpoints
//!
//! Describe how each entity is listed and edited in an admin interface.

use axum::Json;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::admin::{self, EntityDescriptor},
};

use super::ApiPath;

/// List descriptors for every entity
#[utoipa::path(
    get,
    path = "/admin/schema",
    tag = "admin",
    responses(
        (status = 200, description = "Entity descriptors", body = Vec<EntityDescriptor>)
    )
)]
pub async fn list_schema() -> Json<Vec<EntityDescriptor>> {
    Json(admin::descriptors())
}

/// Get the descriptor of one entity
#[utoipa::path(
    get,
    path = "/admin/schema/{entity}",
    tag = "admin",
    params(("entity" = String, Path, description = "Entity name, e.g. book_copy")),
    responses(
        (status = 200, description = "Entity descriptor", body = EntityDescriptor),
        (status = 404, description = "Unknown entity", body = ErrorResponse)
    )
)]
pub async fn get_schema(ApiPath(entity): ApiPath<String>) -> AppResult<Json<EntityDescriptor>> {
    admin::descriptor(&entity)
        .map(Json)
        .ok_or_else(|| AppError::not_found("entity", entity))
}
