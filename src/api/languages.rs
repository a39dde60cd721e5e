//! Language API endpoints

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::language::{CreateLanguage, Language, UpdateLanguage},
    AppState,
};

use super::{location, ApiJson, ApiPath};

/// List languages by name
#[utoipa::path(
    get,
    path = "/languages",
    tag = "languages",
    responses(
        (status = 200, description = "Language list", body = Vec<Language>)
    )
)]
pub async fn list_languages(State(state): State<AppState>) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}

/// Get language by ID
#[utoipa::path(
    get,
    path = "/languages/{id}",
    tag = "languages",
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 200, description = "Language", body = Language),
        (status = 404, description = "Language not found", body = ErrorResponse)
    )
)]
pub async fn get_language(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Language>> {
    let language = state.services.catalog.get_language(id).await?;
    Ok(Json(language))
}

/// Create language
#[utoipa::path(
    post,
    path = "/languages",
    tag = "languages",
    request_body = CreateLanguage,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 409, description = "Name already used, ignoring case", body = ErrorResponse)
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateLanguage>,
) -> AppResult<(StatusCode, HeaderMap, Json<Language>)> {
    let language = state.services.catalog.create_language(data).await?;
    Ok((StatusCode::CREATED, location(&language.path()), Json(language)))
}

/// Update language
#[utoipa::path(
    put,
    path = "/languages/{id}",
    tag = "languages",
    params(("id" = i32, Path, description = "Language ID")),
    request_body = UpdateLanguage,
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 409, description = "Name already used, ignoring case", body = ErrorResponse)
    )
)]
pub async fn update_language(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(data): ApiJson<UpdateLanguage>,
) -> AppResult<Json<Language>> {
    let language = state.services.catalog.update_language(id, data).await?;
    Ok(Json(language))
}

/// Delete language
#[utoipa::path(
    delete,
    path = "/languages/{id}",
    tag = "languages",
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 409, description = "Language still used by books", body = ErrorResponse)
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
