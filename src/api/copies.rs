//! Book copy API endpoints

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppResult, ErrorResponse},
    models::book_copy::{BookCopy, BookCopyEntry, BookCopyQuery, CreateBookCopy, UpdateBookCopy},
    AppState,
};

use super::{location, ApiJson, ApiPath, ApiQuery};

/// List copies by due date, undated copies last
#[utoipa::path(
    get,
    path = "/copies",
    tag = "copies",
    params(BookCopyQuery),
    responses(
        (status = 200, description = "Copy list", body = Vec<BookCopyEntry>),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    )
)]
pub async fn list_copies(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BookCopyQuery>,
) -> AppResult<Json<Vec<BookCopyEntry>>> {
    let copies = state.services.catalog.list_copies(&query).await?;
    Ok(Json(copies))
}

/// Get copy by ID
#[utoipa::path(
    get,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy", body = BookCopyEntry),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn get_copy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<BookCopyEntry>> {
    let copy = state.services.catalog.get_copy(id).await?;
    Ok(Json(copy))
}

/// Create copy. The ID is generated; supplying one is an error.
#[utoipa::path(
    post,
    path = "/copies",
    tag = "copies",
    request_body = CreateBookCopy,
    responses(
        (status = 201, description = "Copy created", body = BookCopy),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 422, description = "Unknown book", body = ErrorResponse)
    )
)]
pub async fn create_copy(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateBookCopy>,
) -> AppResult<(StatusCode, HeaderMap, Json<BookCopy>)> {
    let copy = state.services.catalog.create_copy(data).await?;
    Ok((StatusCode::CREATED, location(&copy.path()), Json(copy)))
}

/// Update copy
#[utoipa::path(
    put,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = Uuid, Path, description = "Copy ID")),
    request_body = UpdateBookCopy,
    responses(
        (status = 200, description = "Copy updated", body = BookCopy),
        (status = 404, description = "Copy not found", body = ErrorResponse),
        (status = 422, description = "Unknown book", body = ErrorResponse)
    )
)]
pub async fn update_copy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<UpdateBookCopy>,
) -> AppResult<Json<BookCopy>> {
    let copy = state.services.catalog.update_copy(id, data).await?;
    Ok(Json(copy))
}

/// Delete copy
#[utoipa::path(
    delete,
    path = "/copies/{id}",
    tag = "copies",
    params(("id" = Uuid, Path, description = "Copy ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 404, description = "Copy not found", body = ErrorResponse)
    )
)]
pub async fn delete_copy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_copy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
