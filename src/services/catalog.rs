//! Catalog management service
//!
//! Cleans and validates requests before they reach the store: strings are
//! trimmed, lengths checked, ISBNs normalized to 13 digits. Uniqueness and
//! references are checked by the store itself, under its write lock.

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{check_lifespan, Author, CreateAuthor, UpdateAuthor},
        book::{normalize_isbn, Book, BookDetails, BookListEntry, CreateBook, UpdateBook},
        book_copy::{BookCopy, BookCopyEntry, BookCopyQuery, CreateBookCopy, UpdateBookCopy},
        genre::{CreateGenre, Genre, UpdateGenre},
        language::{CreateLanguage, Language, UpdateLanguage},
    },
    repository::Repository,
};

fn trimmed(s: &str) -> String {
    s.trim().to_string()
}

fn trimmed_opt(s: &Option<String>) -> Option<String> {
    s.as_deref().map(trimmed)
}

/// Log a failed catalog call at a level matching the failure kind
fn log_rejection<T>(action: &str, result: AppResult<T>) -> AppResult<T> {
    if let Err(ref e) = result {
        match e {
            AppError::ConstraintViolation { .. }
            | AppError::Reference { .. }
            | AppError::ReferentialIntegrity { .. } => {
                tracing::warn!("Catalog {} rejected: {}", action, e)
            }
            AppError::NotFound { .. } | AppError::Validation(_) => {
                tracing::debug!("Catalog {} failed: {}", action, e)
            }
            AppError::Storage(_) => tracing::error!("Catalog {} failed: {}", action, e),
        }
    }
    result
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// `snapshot` when writes reach disk, `memory` otherwise
    pub fn storage_mode(&self) -> &'static str {
        if self.repository.is_persistent() {
            "snapshot"
        } else {
            "memory"
        }
    }

    // =========================================================================
    // GENRES
    // =========================================================================

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres_list().await
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres_get(id).await
    }

    pub async fn create_genre(&self, data: CreateGenre) -> AppResult<Genre> {
        let data = CreateGenre {
            name: trimmed(&data.name),
        };
        data.validate()?;
        let genre = log_rejection("create genre", self.repository.genres_create(&data.name).await)?;
        tracing::info!("Catalog: created genre id={} name={:?}", genre.id, genre.name);
        Ok(genre)
    }

    pub async fn update_genre(&self, id: i32, data: UpdateGenre) -> AppResult<Genre> {
        let data = UpdateGenre {
            name: trimmed_opt(&data.name),
        };
        data.validate()?;
        let genre = log_rejection("update genre", self.repository.genres_update(id, &data).await)?;
        tracing::info!("Catalog: updated genre id={}", id);
        Ok(genre)
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        log_rejection("delete genre", self.repository.genres_delete(id).await)?;
        tracing::info!("Catalog: deleted genre id={}", id);
        Ok(())
    }

    // =========================================================================
    // LANGUAGES
    // =========================================================================

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages_list().await
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Language> {
        self.repository.languages_get(id).await
    }

    pub async fn create_language(&self, data: CreateLanguage) -> AppResult<Language> {
        let data = CreateLanguage {
            name: trimmed(&data.name),
        };
        data.validate()?;
        let language = log_rejection(
            "create language",
            self.repository.languages_create(&data.name).await,
        )?;
        tracing::info!("Catalog: created language id={} name={:?}", language.id, language.name);
        Ok(language)
    }

    pub async fn update_language(&self, id: i32, data: UpdateLanguage) -> AppResult<Language> {
        let data = UpdateLanguage {
            name: trimmed_opt(&data.name),
        };
        data.validate()?;
        let language = log_rejection(
            "update language",
            self.repository.languages_update(id, &data).await,
        )?;
        tracing::info!("Catalog: updated language id={}", id);
        Ok(language)
    }

    pub async fn delete_language(&self, id: i32) -> AppResult<()> {
        log_rejection("delete language", self.repository.languages_delete(id).await)?;
        tracing::info!("Catalog: deleted language id={}", id);
        Ok(())
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors_list().await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors_get(id).await
    }

    pub async fn create_author(&self, data: CreateAuthor) -> AppResult<Author> {
        let data = CreateAuthor {
            first_name: trimmed(&data.first_name),
            last_name: trimmed(&data.last_name),
            ..data
        };
        data.validate()?;
        check_lifespan(data.date_of_birth, data.date_of_death)?;
        let author = log_rejection("create author", self.repository.authors_create(&data).await)?;
        tracing::info!("Catalog: created author id={} ({})", author.id, author);
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, data: UpdateAuthor) -> AppResult<Author> {
        let data = UpdateAuthor {
            first_name: trimmed_opt(&data.first_name),
            last_name: trimmed_opt(&data.last_name),
            ..data
        };
        data.validate()?;
        let author = log_rejection("update author", self.repository.authors_update(id, &data).await)?;
        tracing::info!("Catalog: updated author id={}", id);
        Ok(author)
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        log_rejection("delete author", self.repository.authors_delete(id).await)?;
        tracing::info!("Catalog: deleted author id={}", id);
        Ok(())
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    pub async fn list_books(&self) -> AppResult<Vec<BookListEntry>> {
        self.repository.books_list().await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books_get_details(id).await
    }

    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        let data = CreateBook {
            title: trimmed(&data.title),
            summary: trimmed(&data.summary),
            isbn: normalize_isbn(&data.isbn)?,
            ..data
        };
        data.validate()?;
        let book = log_rejection("create book", self.repository.books_create(&data).await)?;
        tracing::info!("Catalog: created book id={} isbn={}", book.id, book.isbn);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        let data = UpdateBook {
            title: trimmed_opt(&data.title),
            summary: trimmed_opt(&data.summary),
            isbn: data.isbn.as_deref().map(normalize_isbn).transpose()?,
            ..data
        };
        data.validate()?;
        let book = log_rejection("update book", self.repository.books_update(id, &data).await)?;
        tracing::info!("Catalog: updated book id={}", id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        log_rejection("delete book", self.repository.books_delete(id).await)?;
        tracing::info!("Catalog: deleted book id={}", id);
        Ok(())
    }

    /// Copies of a book (the inline list on the book form)
    pub async fn list_book_copies(&self, book_id: i32) -> AppResult<Vec<BookCopyEntry>> {
        self.repository.copies_list_for_book(book_id).await
    }

    // =========================================================================
    // BOOK COPIES
    // =========================================================================

    pub async fn list_copies(&self, query: &BookCopyQuery) -> AppResult<Vec<BookCopyEntry>> {
        tracing::debug!("Listing copies with {:?}", query);
        self.repository.copies_list(query).await
    }

    pub async fn get_copy(&self, id: Uuid) -> AppResult<BookCopyEntry> {
        self.repository.copies_get(id).await
    }

    pub async fn create_copy(&self, data: CreateBookCopy) -> AppResult<BookCopy> {
        let data = CreateBookCopy {
            imprint: trimmed(&data.imprint),
            ..data
        };
        data.validate()?;
        let copy = log_rejection("create copy", self.repository.copies_create(&data).await)?;
        tracing::info!(
            "Catalog: created copy id={} book={:?} status={}",
            copy.id,
            copy.book_id,
            copy.status
        );
        Ok(copy)
    }

    pub async fn update_copy(&self, id: Uuid, data: UpdateBookCopy) -> AppResult<BookCopy> {
        let data = UpdateBookCopy {
            imprint: trimmed_opt(&data.imprint),
            ..data
        };
        data.validate()?;
        let copy = log_rejection("update copy", self.repository.copies_update(id, &data).await)?;
        tracing::info!("Catalog: updated copy id={} status={}", id, copy.status);
        Ok(copy)
    }

    pub async fn delete_copy(&self, id: Uuid) -> AppResult<()> {
        log_rejection("delete copy", self.repository.copies_delete(id).await)?;
        tracing::info!("Catalog: deleted copy id={}", id);
        Ok(())
    }
}
