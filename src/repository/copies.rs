//! Book copy domain methods on Repository

use uuid::Uuid;

use super::{link, unlink, Catalog, Repository};
use crate::{
    error::{AppError, AppResult},
    models::book_copy::{BookCopy, BookCopyEntry, BookCopyQuery, CreateBookCopy, UpdateBookCopy},
};

impl Catalog {
    /// Random v4 id not yet used by any copy
    fn fresh_copy_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if !self.copies.contains_key(&id) {
                return id;
            }
        }
    }

    fn check_copy_book(&self, book_id: Option<i32>) -> AppResult<()> {
        match book_id {
            Some(id) if !self.books.contains_key(&id) => {
                Err(AppError::reference("book_copy", "book_id", id))
            }
            _ => Ok(()),
        }
    }

    /// Store a copy and keep the book-to-copies index in step
    pub(crate) fn copy_put(&mut self, copy: BookCopy) -> AppResult<BookCopy> {
        self.check_copy_book(copy.book_id)?;
        if let Some(previous_book) = self.copies.get(&copy.id).and_then(|c| c.book_id) {
            unlink(&mut self.idx.copies_by_book, &previous_book, &copy.id);
        }
        if let Some(book_id) = copy.book_id {
            link(&mut self.idx.copies_by_book, book_id, copy.id);
        }
        self.copies.insert(copy.id, copy.clone());
        Ok(copy)
    }

    fn copy_insert(&mut self, data: &CreateBookCopy) -> AppResult<BookCopy> {
        let copy = BookCopy {
            id: self.fresh_copy_id(),
            book_id: data.book_id,
            imprint: data.imprint.clone(),
            due_back: data.due_back,
            status: data.status.unwrap_or_default(),
        };
        self.copy_put(copy)
    }

    fn copy_update(&mut self, id: Uuid, data: &UpdateBookCopy) -> AppResult<BookCopy> {
        let mut copy = self
            .copies
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("book_copy", id))?;

        if let Some(book_id) = data.book_id {
            copy.book_id = book_id;
        }
        if let Some(ref imprint) = data.imprint {
            copy.imprint = imprint.clone();
        }
        if let Some(due_back) = data.due_back {
            copy.due_back = due_back;
        }
        if let Some(status) = data.status {
            copy.status = status;
        }

        self.copy_put(copy)
    }

    fn copy_remove(&mut self, id: Uuid) -> AppResult<()> {
        let copy = self
            .copies
            .remove(&id)
            .ok_or_else(|| AppError::not_found("book_copy", id))?;
        if let Some(book_id) = copy.book_id {
            unlink(&mut self.idx.copies_by_book, &book_id, &id);
        }
        Ok(())
    }

    fn copy_entry(&self, copy: &BookCopy) -> BookCopyEntry {
        BookCopyEntry::new(copy, self.book_title(copy.book_id))
    }
}

impl Repository {
    /// List copies matching `query`, by due date with undated copies last
    pub async fn copies_list(&self, query: &BookCopyQuery) -> AppResult<Vec<BookCopyEntry>> {
        let catalog = self.read().await;
        let mut copies: Vec<&BookCopy> = catalog.copies.values().filter(|c| query.matches(c)).collect();
        copies.sort_by(|a, b| BookCopy::listing_cmp(a, b));
        Ok(copies.into_iter().map(|c| catalog.copy_entry(c)).collect())
    }

    /// List the copies of one book
    pub async fn copies_list_for_book(&self, book_id: i32) -> AppResult<Vec<BookCopyEntry>> {
        let catalog = self.read().await;
        if !catalog.books.contains_key(&book_id) {
            return Err(AppError::not_found("book", book_id));
        }
        Ok(catalog
            .book_copies(book_id)
            .iter()
            .map(|c| catalog.copy_entry(c))
            .collect())
    }

    /// Get copy by ID
    pub async fn copies_get(&self, id: Uuid) -> AppResult<BookCopyEntry> {
        let catalog = self.read().await;
        catalog
            .copies
            .get(&id)
            .map(|c| catalog.copy_entry(c))
            .ok_or_else(|| AppError::not_found("book_copy", id))
    }

    /// Create copy with a freshly generated id
    pub async fn copies_create(&self, data: &CreateBookCopy) -> AppResult<BookCopy> {
        self.commit(|catalog| catalog.copy_insert(data)).await
    }

    /// Update copy. Status changes are unrestricted.
    pub async fn copies_update(&self, id: Uuid, data: &UpdateBookCopy) -> AppResult<BookCopy> {
        self.commit(|catalog| catalog.copy_update(id, data)).await
    }

    /// Delete copy
    pub async fn copies_delete(&self, id: Uuid) -> AppResult<()> {
        self.commit(|catalog| catalog.copy_remove(id)).await
    }
}
