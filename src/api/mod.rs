//! API handlers for the catalog REST endpoints

pub mod admin;
pub mod authors;
pub mod books;
pub mod copies;
pub mod genres;
pub mod health;
pub mod languages;
pub mod openapi;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header::LOCATION, HeaderMap, HeaderValue},
    routing::get,
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// JSON body extractor reporting malformed bodies as validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor reporting malformed ids as validation errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor reporting bad filters as validation errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `Location` header pointing at a freshly created record
pub(crate) fn location(path: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(path) {
        headers.insert(LOCATION, value);
    }
    headers
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Genres
        .route("/genres", get(genres::list_genres).post(genres::create_genre))
        .route(
            "/genres/:id",
            get(genres::get_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
        // Languages
        .route("/languages", get(languages::list_languages).post(languages::create_language))
        .route(
            "/languages/:id",
            get(languages::get_language)
                .put(languages::update_language)
                .delete(languages::delete_language),
        )
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/copies", get(books::list_book_copies))
        // Book copies
        .route("/copies", get(copies::list_copies).post(copies::create_copy))
        .route(
            "/copies/:id",
            get(copies::get_copy)
                .put(copies::update_copy)
                .delete(copies::delete_copy),
        )
        // Admin descriptors
        .route("/admin/schema", get(admin::list_schema))
        .route("/admin/schema/:entity", get(admin::get_schema))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
