//! Book domain methods on Repository

use super::{link, next_id, referrers, unlink, Catalog, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{dedup_genres, genre_summary, Book, BookDetails, BookListEntry, CreateBook, UpdateBook},
        book_copy::{BookCopy, BookCopyEntry},
    },
};

impl Catalog {
    /// Every reference a book holds must resolve
    fn check_book_refs(&self, book: &Book) -> AppResult<()> {
        if let Some(author_id) = book.author_id {
            if !self.authors.contains_key(&author_id) {
                return Err(AppError::reference("book", "author_id", author_id));
            }
        }
        if !self.languages.contains_key(&book.language_id) {
            return Err(AppError::reference("book", "language_id", book.language_id));
        }
        if let Some(missing) = book.genre_ids.iter().find(|id| !self.genres.contains_key(*id)) {
            return Err(AppError::reference("book", "genre_ids", missing));
        }
        Ok(())
    }

    fn check_isbn_free(&self, isbn: &str, own_id: Option<i32>) -> AppResult<()> {
        match self.idx.isbns.get(isbn) {
            Some(&existing) if Some(existing) != own_id => Err(AppError::constraint("book", "isbn", isbn)),
            _ => Ok(()),
        }
    }

    fn index_book(&mut self, book: &Book) {
        self.idx.isbns.insert(book.isbn.clone(), book.id);
        if let Some(author_id) = book.author_id {
            link(&mut self.idx.books_by_author, author_id, book.id);
        }
        link(&mut self.idx.books_by_language, book.language_id, book.id);
        for genre_id in &book.genre_ids {
            link(&mut self.idx.books_by_genre, *genre_id, book.id);
        }
    }

    fn unindex_book(&mut self, book: &Book) {
        self.idx.isbns.remove(&book.isbn);
        if let Some(author_id) = book.author_id {
            unlink(&mut self.idx.books_by_author, &author_id, &book.id);
        }
        unlink(&mut self.idx.books_by_language, &book.language_id, &book.id);
        for genre_id in &book.genre_ids {
            unlink(&mut self.idx.books_by_genre, genre_id, &book.id);
        }
    }

    /// Validate and store a fully built book
    pub(crate) fn book_put(&mut self, book: Book) -> AppResult<Book> {
        self.check_isbn_free(&book.isbn, Some(book.id))?;
        self.check_book_refs(&book)?;
        if let Some(previous) = self.books.get(&book.id).cloned() {
            self.unindex_book(&previous);
        }
        self.index_book(&book);
        self.books.insert(book.id, book.clone());
        Ok(book)
    }

    fn book_insert(&mut self, data: &CreateBook) -> AppResult<Book> {
        // checks run before the sequence moves so a rejected create leaves no trace
        self.check_isbn_free(&data.isbn, None)?;
        let mut book = Book {
            id: 0,
            title: data.title.clone(),
            author_id: data.author_id,
            summary: data.summary.clone(),
            isbn: data.isbn.clone(),
            genre_ids: dedup_genres(data.genre_ids.clone()),
            language_id: data.language_id,
        };
        self.check_book_refs(&book)?;
        book.id = next_id(&mut self.seq.book);
        self.book_put(book)
    }

    fn book_update(&mut self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let mut book = self
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("book", id))?;

        if let Some(ref title) = data.title {
            book.title = title.clone();
        }
        if let Some(author_id) = data.author_id {
            book.author_id = author_id;
        }
        if let Some(ref summary) = data.summary {
            book.summary = summary.clone();
        }
        if let Some(ref isbn) = data.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(ref genre_ids) = data.genre_ids {
            book.genre_ids = dedup_genres(genre_ids.clone());
        }
        if let Some(language_id) = data.language_id {
            book.language_id = language_id;
        }

        self.book_put(book)
    }

    fn book_remove(&mut self, id: i32) -> AppResult<()> {
        let book = self
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("book", id))?;
        let copies = referrers(&self.idx.copies_by_book, &id);
        if copies > 0 {
            return Err(AppError::still_referenced("book", id, "book_copy", copies));
        }
        self.unindex_book(&book);
        self.books.remove(&id);
        Ok(())
    }

    pub(crate) fn book_genre_summary(&self, book: &Book) -> String {
        genre_summary(
            book.genre_ids
                .iter()
                .filter_map(|id| self.genres.get(id))
                .map(|g| g.name.as_str()),
        )
    }

    pub(crate) fn book_title(&self, id: Option<i32>) -> Option<&str> {
        id.and_then(|id| self.books.get(&id)).map(|b| b.title.as_str())
    }

    /// Copies of a book in listing order
    pub(crate) fn book_copies(&self, id: i32) -> Vec<BookCopy> {
        let mut copies: Vec<BookCopy> = self
            .idx
            .copies_by_book
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|copy_id| self.copies.get(copy_id))
            .cloned()
            .collect();
        copies.sort_by(BookCopy::listing_cmp);
        copies
    }

    fn book_details(&self, book: &Book) -> AppResult<BookDetails> {
        let language = self
            .languages
            .get(&book.language_id)
            .cloned()
            .ok_or_else(|| AppError::Storage(format!("book {} has dangling language", book.id)))?;
        let copies = self
            .book_copies(book.id)
            .iter()
            .map(|copy| BookCopyEntry::new(copy, Some(book.title.as_str())))
            .collect();

        Ok(BookDetails {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            author: book.author_id.and_then(|id| self.authors.get(&id)).cloned(),
            language,
            genres: book
                .genre_ids
                .iter()
                .filter_map(|id| self.genres.get(id))
                .cloned()
                .collect(),
            genre_summary: self.book_genre_summary(book),
            copies,
        })
    }
}

impl Repository {
    /// List books by title as list rows
    pub async fn books_list(&self) -> AppResult<Vec<BookListEntry>> {
        let catalog = self.read().await;
        let mut books: Vec<&Book> = catalog.books.values().collect();
        books.sort_by(|a, b| Book::listing_cmp(a, b));
        Ok(books
            .into_iter()
            .map(|book| BookListEntry {
                id: book.id,
                title: book.title.clone(),
                author: book
                    .author_id
                    .and_then(|id| catalog.authors.get(&id))
                    .map(|a| a.to_string()),
                isbn: book.isbn.clone(),
                genre_summary: catalog.book_genre_summary(book),
            })
            .collect())
    }

    /// Get book record by ID
    pub async fn books_get(&self, id: i32) -> AppResult<Book> {
        self.read()
            .await
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("book", id))
    }

    /// Get book with author, language, genres and copies resolved
    pub async fn books_get_details(&self, id: i32) -> AppResult<BookDetails> {
        let catalog = self.read().await;
        let book = catalog
            .books
            .get(&id)
            .ok_or_else(|| AppError::not_found("book", id))?;
        catalog.book_details(book)
    }

    /// Create book. The ISBN must be new and every reference must resolve.
    pub async fn books_create(&self, data: &CreateBook) -> AppResult<Book> {
        self.commit(|catalog| catalog.book_insert(data)).await
    }

    /// Update book
    pub async fn books_update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        self.commit(|catalog| catalog.book_update(id, data)).await
    }

    /// Delete book. Fails while any copy of it exists.
    pub async fn books_delete(&self, id: i32) -> AppResult<()> {
        self.commit(|catalog| catalog.book_remove(id)).await
    }
}
