//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, authors, books, copies, genres, health, languages};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library API",
        version = "0.1.0",
        description = "Catalog of books, authors, genres, languages and book copies",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        // Languages
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        languages::update_language,
        languages::delete_language,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_book_copies,
        // Copies
        copies::list_copies,
        copies::get_copy,
        copies::create_copy,
        copies::update_copy,
        copies::delete_copy,
        // Admin
        admin::list_schema,
        admin::get_schema,
    ),
    components(
        schemas(
            // Genres & languages
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::genre::UpdateGenre,
            crate::models::language::Language,
            crate::models::language::CreateLanguage,
            crate::models::language::UpdateLanguage,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            // Books
            crate::models::book::Book,
            crate::models::book::BookListEntry,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Copies
            crate::models::book_copy::LoanStatus,
            crate::models::book_copy::BookCopy,
            crate::models::book_copy::BookCopyEntry,
            crate::models::book_copy::CreateBookCopy,
            crate::models::book_copy::UpdateBookCopy,
            // Admin
            crate::models::admin::EntityDescriptor,
            crate::models::admin::Fieldset,
            crate::models::admin::Inline,
            crate::models::admin::Choice,
            crate::models::admin::FieldChoices,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "genres", description = "Genre management"),
        (name = "languages", description = "Language management"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management"),
        (name = "copies", description = "Book copy management"),
        (name = "admin", description = "Admin interface descriptors")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
