//! Book API endpoints

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        book::{Book, BookDetails, BookListEntry, CreateBook, UpdateBook},
        book_copy::BookCopyEntry,
    },
    AppState,
};

use super::{location, ApiJson, ApiPath};

/// List books by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Book list", body = Vec<BookListEntry>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookListEntry>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get book with its author, language, genres and copies
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Create book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid fields or ISBN", body = ErrorResponse),
        (status = 409, description = "ISBN already used", body = ErrorResponse),
        (status = 422, description = "Unknown author, language or genre", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<CreateBook>,
) -> AppResult<(StatusCode, HeaderMap, Json<Book>)> {
    let book = state.services.catalog.create_book(data).await?;
    Ok((StatusCode::CREATED, location(&book.path()), Json(book)))
}

/// Update book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid fields or ISBN", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "ISBN already used", body = ErrorResponse),
        (status = 422, description = "Unknown author, language or genre", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(data): ApiJson<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.update_book(id, data).await?;
    Ok(Json(book))
}

/// Delete book. Refused while copies reference it.
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorResponse),
        (status = 409, description = "Book still has copies", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the copies of a book
#[utoipa::path(
    get,
    path = "/books/{id}/copies",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Copies of the book", body = Vec<BookCopyEntry>),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn list_book_copies(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<Json<Vec<BookCopyEntry>>> {
    let copies = state.services.catalog.list_book_copies(id).await?;
    Ok(Json(copies))
}
