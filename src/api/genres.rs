//! Genre API endpoints

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::genre::{CreateGenre, Genre, UpdateGenre},
    AppState,
};

use super::{location, ApiJson, ApiPath};

/// List genres by name
#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genre list", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Get genre by ID
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre", body = Genre),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Genre>> {
    let genre = state.services.catalog.get_genre(id).await?;
    Ok(Json(genre))
}

/// Create genre
#[utoipa::path(
    post,
    path = "/genres",
    tag = "genres",
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 409, description = "Name already used, ignoring case", body = ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateGenre>,
) -> AppResult<(StatusCode, HeaderMap, Json<Genre>)> {
    let genre = state.services.catalog.create_genre(data).await?;
    Ok((StatusCode::CREATED, location(&genre.path()), Json(genre)))
}

/// Update genre
#[utoipa::path(
    put,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = UpdateGenre,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 404, description = "Genre not found", body = ErrorResponse),
        (status = 409, description = "Name already used, ignoring case", body = ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(data): ApiJson<UpdateGenre>,
) -> AppResult<Json<Genre>> {
    let genre = state.services.catalog.update_genre(id, data).await?;
    Ok(Json(genre))
}

/// Delete genre. Books keep their other genres.
#[utoipa::path(
    delete,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_genre(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
