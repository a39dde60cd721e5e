//! Genre domain methods on Repository

use super::{check_unique_name, next_id, Catalog, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        genre::{Genre, UpdateGenre},
        name_key,
    },
};

impl Catalog {
    fn genre_insert(&mut self, name: &str) -> AppResult<Genre> {
        let key = check_unique_name(&self.idx.genre_names, "genre", name, None)?;
        let genre = Genre {
            id: next_id(&mut self.seq.genre),
            name: name.to_string(),
        };
        self.idx.genre_names.insert(key, genre.id);
        self.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    fn genre_update(&mut self, id: i32, data: &UpdateGenre) -> AppResult<Genre> {
        let current = self
            .genres
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("genre", id))?;
        let Some(name) = data.name.as_deref() else {
            return Ok(current);
        };
        let key = check_unique_name(&self.idx.genre_names, "genre", name, Some(id))?;

        self.idx.genre_names.remove(&name_key(&current.name));
        self.idx.genre_names.insert(key, id);
        let genre = Genre {
            id,
            name: name.to_string(),
        };
        self.genres.insert(id, genre.clone());
        Ok(genre)
    }

    /// Removing a genre detaches it from every book that lists it
    fn genre_remove(&mut self, id: i32) -> AppResult<()> {
        let genre = self
            .genres
            .remove(&id)
            .ok_or_else(|| AppError::not_found("genre", id))?;
        self.idx.genre_names.remove(&name_key(&genre.name));
        for book_id in self.idx.books_by_genre.remove(&id).unwrap_or_default() {
            if let Some(book) = self.books.get_mut(&book_id) {
                book.genre_ids.retain(|g| *g != id);
            }
        }
        Ok(())
    }

    pub(crate) fn genres_sorted(&self) -> Vec<Genre> {
        let mut genres: Vec<Genre> = self.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        genres
    }
}

impl Repository {
    /// List all genres by name
    pub async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        Ok(self.read().await.genres_sorted())
    }

    /// Get genre by ID
    pub async fn genres_get(&self, id: i32) -> AppResult<Genre> {
        self.read()
            .await
            .genres
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found("genre", id))
    }

    /// Create genre, rejecting names that collide ignoring case
    pub async fn genres_create(&self, name: &str) -> AppResult<Genre> {
        self.commit(|catalog| catalog.genre_insert(name)).await
    }

    /// Update genre
    pub async fn genres_update(&self, id: i32, data: &UpdateGenre) -> AppResult<Genre> {
        self.commit(|catalog| catalog.genre_update(id, data)).await
    }

    /// Delete genre
    pub async fn genres_delete(&self, id: i32) -> AppResult<()> {
        self.commit(|catalog| catalog.genre_remove(id)).await
    }
}
